use ownerscope_application::OwnershipService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ownership_service: OwnershipService,
    /// Pool checked by the health endpoint; absent when the service runs
    /// without a database.
    pub postgres_pool: Option<PgPool>,
}
