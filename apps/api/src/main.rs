//! Ownerscope API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use ownerscope_application::OwnershipService;
use ownerscope_core::AppError;
use ownerscope_infrastructure::PostgresOwnershipRepository;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let address = config.socket_address()?;

    let pool = api_services::build_pool(&config.database);
    let repository = Arc::new(PostgresOwnershipRepository::new(pool.clone()));
    let app_state = AppState {
        ownership_service: OwnershipService::new(repository),
        postgres_pool: Some(pool),
    };

    let app = api_router::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        database_host = %config.database.host,
        database_name = %config.database.name,
        "ownerscope-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
