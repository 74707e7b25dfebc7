use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;


pub fn build_router(app_state: AppState) -> Router {
    let task_routes = Router::new()
        .route(
            "/api/tasks/ownership",
            get(handlers::tasks::list_task_ownership_handler),
        )
        .route(
            "/api/tasks/status",
            get(handlers::tasks::list_task_statuses_handler),
        )
        .route(
            "/api/tasks/{task_id}/owner",
            get(handlers::tasks::task_owner_handler),
        )
        .route(
            "/api/tasks/{task_id}/check-access/{username}",
            get(handlers::tasks::check_access_handler),
        );

    Router::new()
        .route("/", get(handlers::index::index_handler))
        .route("/health", get(handlers::health::health_handler))
        .merge(task_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
