use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ownerscope_application::{OwnershipRepository, TaskListQuery};
use ownerscope_core::AppResult;
use ownerscope_domain::{
    GroupPermissionGrant, PermissionHolder, ProjectId, TaskId, TaskRecord, UserAccount, UserId,
    Username,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database_error;

mod permissions;
mod tasks;
mod users;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed reader over the external task, project and permission tables.
#[derive(Clone)]
pub struct PostgresOwnershipRepository {
    pool: PgPool,
}

impl PostgresOwnershipRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    task_id: Uuid,
    task_uuid: String,
    task_name: Option<String>,
    task_status: Option<i32>,
    created_at: DateTime<Utc>,
    project_id: i32,
    project_name: String,
    project_public: bool,
}

impl From<TaskRow> for TaskRecord {
    fn from(row: TaskRow) -> Self {
        Self {
            id: TaskId::from_uuid(row.task_id),
            uuid: row.task_uuid,
            name: row.task_name,
            project_id: ProjectId::from_i32(row.project_id),
            project_name: row.project_name,
            project_is_public: row.project_public,
            status: row.task_status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PermissionHolderRow {
    project_id: i32,
    user_id: i32,
    username: String,
    permissions: Vec<String>,
    groups: Vec<String>,
}

impl From<PermissionHolderRow> for PermissionHolder {
    fn from(row: PermissionHolderRow) -> Self {
        Self {
            project_id: ProjectId::from_i32(row.project_id),
            user_id: UserId::from_i32(row.user_id),
            username: row.username,
            permissions: row.permissions.into_iter().collect(),
            groups: row.groups.into_iter().collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
    is_superuser: bool,
    groups: Vec<String>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_i32(row.user_id),
            username: row.username,
            is_superuser: row.is_superuser,
            groups: row.groups.into_iter().collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct GroupPermissionRow {
    group_name: String,
    permissions: Vec<String>,
}

impl From<GroupPermissionRow> for GroupPermissionGrant {
    fn from(row: GroupPermissionRow) -> Self {
        Self {
            group_name: row.group_name,
            permissions: row.permissions.into_iter().collect(),
        }
    }
}

#[async_trait]
impl OwnershipRepository for PostgresOwnershipRepository {
    async fn list_tasks(&self, query: TaskListQuery) -> AppResult<Vec<TaskRecord>> {
        self.list_tasks_impl(query).await
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<TaskRecord>> {
        self.find_task_impl(task_id).await
    }

    async fn list_permission_holders(
        &self,
        project_ids: &[ProjectId],
    ) -> AppResult<Vec<PermissionHolder>> {
        self.list_permission_holders_impl(project_ids).await
    }

    async fn find_user(&self, username: &Username) -> AppResult<Option<UserAccount>> {
        self.find_user_impl(username).await
    }

    async fn list_direct_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<BTreeSet<String>> {
        self.list_direct_permissions_impl(project_id, user_id).await
    }

    async fn list_group_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<Vec<GroupPermissionGrant>> {
        self.list_group_permissions_impl(project_id, user_id).await
    }
}
