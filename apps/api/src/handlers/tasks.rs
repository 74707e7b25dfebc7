use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use ownerscope_application::TaskListQuery;
use ownerscope_domain::{TaskId, Username};

use crate::dto::{
    TaskAccessResponse, TaskOwnerResponse, TaskOwnershipListResponse, TaskOwnershipQuery,
    TaskStatusResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_task_ownership_handler(
    State(state): State<AppState>,
    query: Result<Query<TaskOwnershipQuery>, QueryRejection>,
) -> ApiResult<Json<TaskOwnershipListResponse>> {
    let Query(query) = query?;
    let query = TaskListQuery::from_transport(query.limit, query.offset, query.status.as_deref())?;

    let page = state.ownership_service.list_task_ownership(query).await?;

    Ok(Json(TaskOwnershipListResponse::from_page(page, Utc::now())))
}

pub async fn list_task_statuses_handler(
    State(state): State<AppState>,
) -> Json<Vec<TaskStatusResponse>> {
    Json(
        state
            .ownership_service
            .list_task_statuses()
            .iter()
            .map(TaskStatusResponse::from)
            .collect(),
    )
}

pub async fn task_owner_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskOwnerResponse>> {
    let task_id = task_id.parse::<TaskId>()?;
    let report = state.ownership_service.task_owner(task_id).await?;

    Ok(Json(TaskOwnerResponse::from(report)))
}

pub async fn check_access_handler(
    State(state): State<AppState>,
    Path((task_id, username)): Path<(String, String)>,
) -> ApiResult<Json<TaskAccessResponse>> {
    let task_id = task_id.parse::<TaskId>()?;
    let username = Username::new(username)?;
    let report = state
        .ownership_service
        .check_access(task_id, &username)
        .await?;

    Ok(Json(TaskAccessResponse::from(report)))
}
