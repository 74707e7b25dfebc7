use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use ownerscope_core::{AppError, AppResult};
use ownerscope_domain::{
    GroupPermissionGrant, PermissionHolder, ProjectId, TaskId, TaskRecord, TaskStatus,
    UserAccount, UserId, Username,
};

/// Largest page size a caller may request.
pub const MAX_TASK_PAGE_SIZE: usize = 500;

/// Pagination and filter options for task listings.
///
/// Without a limit the listing covers every task past `offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Maximum number of tasks returned, or `None` for all of them.
    pub limit: Option<usize>,
    /// Number of tasks skipped, in creation order.
    pub offset: usize,
    /// Optional processing status filter.
    pub status: Option<TaskStatus>,
}

impl TaskListQuery {
    /// Validates raw transport values into a query.
    pub fn from_transport(
        limit: Option<usize>,
        offset: Option<usize>,
        status: Option<&str>,
    ) -> AppResult<Self> {
        if let Some(limit) = limit
            && (limit == 0 || limit > MAX_TASK_PAGE_SIZE)
        {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_TASK_PAGE_SIZE}, got {limit}"
            )));
        }

        let status = status
            .filter(|value| !value.trim().is_empty())
            .map(TaskStatus::from_str)
            .transpose()?;

        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
            status,
        })
    }
}

/// Read-only port over the external task, project and permission tables.
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// Lists tasks with their project, ordered by creation time then task id.
    async fn list_tasks(&self, query: TaskListQuery) -> AppResult<Vec<TaskRecord>>;

    /// Finds one task with its project.
    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<TaskRecord>>;

    /// Lists users holding direct permission rows on the given projects.
    async fn list_permission_holders(
        &self,
        project_ids: &[ProjectId],
    ) -> AppResult<Vec<PermissionHolder>>;

    /// Finds a user account by name.
    async fn find_user(&self, username: &Username) -> AppResult<Option<UserAccount>>;

    /// Lists codenames granted to a user directly on a project.
    async fn list_direct_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<BTreeSet<String>>;

    /// Lists grants on a project held by groups the user belongs to.
    async fn list_group_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<Vec<GroupPermissionGrant>>;
}
