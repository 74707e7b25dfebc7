use chrono::{DateTime, Utc};
use ownerscope_application::{TaskAccessReport, TaskOwnerReport, TaskOwnershipPage};
use ownerscope_domain::{GroupPermissionGrant, TaskOwnership, TaskStatus};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string accepted by the ownership listing.
///
/// Values stay raw here and are validated by the application layer.
#[derive(Debug, Default, Deserialize)]
pub struct TaskOwnershipQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<String>,
}

/// One task with its inferred owner.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/task-ownership-response.ts")]
pub struct TaskOwnershipResponse {
    /// Hyphenated task UUID.
    pub task_id: String,
    pub task_uuid: String,
    pub task_name: Option<String>,
    pub project_id: i32,
    pub project_name: String,
    pub owner_username: Option<String>,
    pub permissions: Vec<String>,
    pub permission_count: usize,
    pub group_memberships: Vec<String>,
    pub status: Option<i32>,
    pub status_name: String,
    /// Task creation time, RFC 3339.
    pub processing_date: String,
    #[ts(type = "number")]
    pub days_since_processed: i64,
}

impl TaskOwnershipResponse {
    /// Builds the listing row relative to `now`.
    #[must_use]
    pub fn from_ownership(ownership: TaskOwnership, now: DateTime<Utc>) -> Self {
        let TaskOwnership { task, owner } = ownership;
        let days_since_processed = task.days_since_processed(now);
        let status_name = task.status_name();
        let (owner_username, permissions, group_memberships) = match owner {
            Some(owner) => (
                Some(owner.username),
                owner.permissions.into_iter().collect(),
                owner.groups.into_iter().collect(),
            ),
            None => (None, Vec::new(), Vec::new()),
        };

        Self {
            task_id: task.id.to_string(),
            task_uuid: task.uuid,
            task_name: task.name,
            project_id: task.project_id.as_i32(),
            project_name: task.project_name,
            permission_count: permissions.len(),
            owner_username,
            permissions,
            group_memberships,
            status: task.status,
            status_name,
            processing_date: task.created_at.to_rfc3339(),
            days_since_processed,
        }
    }
}

/// Task listing page. `limit` is null when every task was requested.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/task-ownership-list-response.ts")]
pub struct TaskOwnershipListResponse {
    pub tasks: Vec<TaskOwnershipResponse>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub has_more: bool,
}

impl TaskOwnershipListResponse {
    #[must_use]
    pub fn from_page(page: TaskOwnershipPage, now: DateTime<Utc>) -> Self {
        Self {
            tasks: page
                .tasks
                .into_iter()
                .map(|ownership| TaskOwnershipResponse::from_ownership(ownership, now))
                .collect(),
            limit: page.limit,
            offset: page.offset,
            has_more: page.has_more,
        }
    }
}

/// Entry of the status catalogue.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/task-status-response.ts")]
pub struct TaskStatusResponse {
    pub code: i32,
    pub name: String,
}

impl From<&TaskStatus> for TaskStatusResponse {
    fn from(status: &TaskStatus) -> Self {
        Self {
            code: status.code(),
            name: status.name().to_owned(),
        }
    }
}

/// Owner of a single task.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/task-owner-response.ts")]
pub struct TaskOwnerResponse {
    pub task_id: String,
    pub task_uuid: String,
    pub task_name: Option<String>,
    pub project_id: i32,
    pub project_name: String,
    pub owner_username: String,
    pub permissions: Vec<String>,
    pub group_memberships: Vec<String>,
    pub status: Option<i32>,
    pub status_name: String,
}

impl From<TaskOwnerReport> for TaskOwnerResponse {
    fn from(report: TaskOwnerReport) -> Self {
        let TaskOwnerReport { task, owner } = report;
        let status_name = task.status_name();

        Self {
            task_id: task.id.to_string(),
            task_uuid: task.uuid,
            task_name: task.name,
            project_id: task.project_id.as_i32(),
            project_name: task.project_name,
            owner_username: owner.username,
            permissions: owner.permissions.into_iter().collect(),
            group_memberships: owner.groups.into_iter().collect(),
            status: task.status,
            status_name,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/group-permission-response.ts")]
pub struct GroupPermissionResponse {
    pub group_name: String,
    pub permissions: Vec<String>,
}

impl From<GroupPermissionGrant> for GroupPermissionResponse {
    fn from(grant: GroupPermissionGrant) -> Self {
        Self {
            group_name: grant.group_name,
            permissions: grant.permissions.into_iter().collect(),
        }
    }
}

/// Access check result with its explanation.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/task-access-response.ts")]
pub struct TaskAccessResponse {
    pub task_id: String,
    pub task_name: Option<String>,
    pub task_status: Option<i32>,
    pub status_name: String,
    pub project_id: i32,
    pub project_name: String,
    pub username: String,
    pub has_access: bool,
    pub access_type: Vec<String>,
    pub direct_permissions: Vec<String>,
    pub group_permissions: Vec<GroupPermissionResponse>,
    pub user_groups: Vec<String>,
    pub is_superuser: bool,
    pub is_public_project: bool,
}

impl From<TaskAccessReport> for TaskAccessResponse {
    fn from(report: TaskAccessReport) -> Self {
        let TaskAccessReport {
            task,
            user,
            decision,
        } = report;
        let status_name = task.status_name();

        Self {
            task_id: task.id.to_string(),
            task_name: task.name,
            task_status: task.status,
            status_name,
            project_id: task.project_id.as_i32(),
            project_name: task.project_name,
            username: user.username,
            has_access: decision.has_access,
            access_type: decision.access_type,
            direct_permissions: decision.direct_permissions.into_iter().collect(),
            group_permissions: decision
                .group_permissions
                .into_iter()
                .map(GroupPermissionResponse::from)
                .collect(),
            user_groups: user.groups.into_iter().collect(),
            is_superuser: decision.is_superuser,
            is_public_project: decision.is_public_project,
        }
    }
}
