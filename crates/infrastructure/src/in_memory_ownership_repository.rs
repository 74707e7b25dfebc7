use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use ownerscope_application::{OwnershipRepository, TaskListQuery};
use ownerscope_core::AppResult;
use ownerscope_domain::{
    GroupPermissionGrant, PermissionHolder, ProjectId, TaskId, TaskRecord, UserAccount, UserId,
    Username,
};

/// In-memory ownership repository implementation.
///
/// Holds a fixed snapshot of the external tables; built once and then shared
/// read-only.
#[derive(Debug, Default)]
pub struct InMemoryOwnershipRepository {
    tasks: Vec<TaskRecord>,
    users: Vec<UserAccount>,
    user_grants: HashMap<(ProjectId, UserId), BTreeSet<String>>,
    group_grants: HashMap<(ProjectId, String), BTreeSet<String>>,
}

impl InMemoryOwnershipRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task row.
    #[must_use]
    pub fn with_task(mut self, task: TaskRecord) -> Self {
        self.tasks.push(task);
        self.tasks.sort_by_key(|value| (value.created_at, value.id));
        self
    }

    /// Adds a user account.
    #[must_use]
    pub fn with_user(mut self, user: UserAccount) -> Self {
        self.users.push(user);
        self
    }

    /// Grants codenames on a project directly to a user.
    #[must_use]
    pub fn with_user_grant(mut self, project_id: ProjectId, user_id: UserId, codenames: &[&str]) -> Self {
        self.user_grants
            .entry((project_id, user_id))
            .or_default()
            .extend(codenames.iter().map(|value| (*value).to_owned()));
        self
    }

    /// Grants codenames on a project to a group.
    #[must_use]
    pub fn with_group_grant(mut self, project_id: ProjectId, group_name: &str, codenames: &[&str]) -> Self {
        self.group_grants
            .entry((project_id, group_name.to_owned()))
            .or_default()
            .extend(codenames.iter().map(|value| (*value).to_owned()));
        self
    }

    fn user_by_id(&self, user_id: UserId) -> Option<&UserAccount> {
        self.users.iter().find(|user| user.id == user_id)
    }
}

#[async_trait]
impl OwnershipRepository for InMemoryOwnershipRepository {
    async fn list_tasks(&self, query: TaskListQuery) -> AppResult<Vec<TaskRecord>> {
        Ok(self
            .tasks
            .iter()
            .filter(|task| {
                query
                    .status
                    .is_none_or(|status| task.status == Some(status.code()))
            })
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<TaskRecord>> {
        Ok(self.tasks.iter().find(|task| task.id == task_id).cloned())
    }

    async fn list_permission_holders(
        &self,
        project_ids: &[ProjectId],
    ) -> AppResult<Vec<PermissionHolder>> {
        let mut holders: Vec<PermissionHolder> = self
            .user_grants
            .iter()
            .filter(|((project_id, _), codenames)| {
                project_ids.contains(project_id) && !codenames.is_empty()
            })
            .filter_map(|((project_id, user_id), codenames)| {
                let user = self.user_by_id(*user_id)?;
                Some(PermissionHolder {
                    project_id: *project_id,
                    user_id: *user_id,
                    username: user.username.clone(),
                    permissions: codenames.clone(),
                    groups: user.groups.clone(),
                })
            })
            .collect();

        holders.sort_by_key(|holder| (holder.project_id, holder.user_id));
        Ok(holders)
    }

    async fn find_user(&self, username: &Username) -> AppResult<Option<UserAccount>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username == username.as_str())
            .cloned())
    }

    async fn list_direct_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<BTreeSet<String>> {
        Ok(self
            .user_grants
            .get(&(project_id, user_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_group_permissions(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<Vec<GroupPermissionGrant>> {
        let Some(user) = self.user_by_id(user_id) else {
            return Ok(Vec::new());
        };

        let mut grants: Vec<GroupPermissionGrant> = self
            .group_grants
            .iter()
            .filter(|((granted_project, group_name), _)| {
                *granted_project == project_id && user.groups.contains(group_name)
            })
            .map(|((_, group_name), codenames)| GroupPermissionGrant {
                group_name: group_name.clone(),
                permissions: codenames.clone(),
            })
            .collect();

        grants.sort();
        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{Duration, TimeZone, Utc};
    use ownerscope_application::{OwnershipRepository, TaskListQuery};
    use ownerscope_domain::{ProjectId, TaskId, TaskRecord, TaskStatus, UserAccount, UserId};
    use uuid::Uuid;

    use super::InMemoryOwnershipRepository;

    fn task(id: u128, created_hour: i64, status: TaskStatus) -> TaskRecord {
        let created_at = Utc
            .with_ymd_and_hms(2026, 5, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
            + Duration::hours(created_hour);

        TaskRecord {
            id: TaskId::from_uuid(Uuid::from_u128(id)),
            uuid: String::new(),
            name: None,
            project_id: ProjectId::from_i32(1),
            project_name: "Survey".to_owned(),
            project_is_public: false,
            status: Some(status.code()),
            created_at,
        }
    }

    fn listed_ids(page: &[TaskRecord]) -> Vec<u128> {
        page.iter().map(|task| task.id.as_uuid().as_u128()).collect()
    }

    #[tokio::test]
    async fn tasks_are_listed_in_creation_order_with_pagination() {
        let repository = InMemoryOwnershipRepository::new()
            .with_task(task(1, 3, TaskStatus::Running))
            .with_task(task(2, 1, TaskStatus::Running))
            .with_task(task(3, 2, TaskStatus::Failed));

        let page = repository
            .list_tasks(TaskListQuery {
                limit: Some(2),
                offset: 1,
                status: None,
            })
            .await
            .unwrap_or_default();
        assert_eq!(listed_ids(&page), vec![3, 1]);
    }

    #[tokio::test]
    async fn missing_limit_lists_every_task() {
        let repository = (1..=120).fold(InMemoryOwnershipRepository::new(), |repository, id| {
            repository.with_task(task(id, 0, TaskStatus::Completed))
        });

        let page = repository
            .list_tasks(TaskListQuery::default())
            .await
            .unwrap_or_default();
        assert_eq!(page.len(), 120);
        assert_eq!(listed_ids(&page).first(), Some(&1));
    }

    #[tokio::test]
    async fn holders_require_a_known_user() {
        let project_id = ProjectId::from_i32(1);
        let repository = InMemoryOwnershipRepository::new()
            .with_user(UserAccount {
                id: UserId::from_i32(5),
                username: "alice".to_owned(),
                is_superuser: false,
                groups: BTreeSet::new(),
            })
            .with_user_grant(project_id, UserId::from_i32(5), &["view_project"])
            .with_user_grant(project_id, UserId::from_i32(6), &["view_project"]);

        let holders = repository
            .list_permission_holders(&[project_id])
            .await
            .unwrap_or_default();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].username, "alice");
    }
}
