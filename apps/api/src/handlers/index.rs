use axum::Json;

use crate::dto::ServiceIndexResponse;

const TASK_ROUTES: &[&str] = &[
    "/api/tasks/ownership",
    "/api/tasks/status",
    "/api/tasks/{task_id}/owner",
    "/api/tasks/{task_id}/check-access/{username}",
];

pub async fn index_handler() -> Json<ServiceIndexResponse> {
    Json(ServiceIndexResponse {
        service: "Task Ownership API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: TASK_ROUTES.to_vec(),
    })
}
