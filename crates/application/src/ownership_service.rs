use std::collections::BTreeSet;
use std::sync::Arc;

use ownerscope_core::{AppError, AppResult};
use ownerscope_domain::{
    AccessDecision, PermissionHolder, ProjectId, TaskId, TaskOwnership, TaskRecord, TaskStatus,
    UserAccount, Username,
};

use crate::{OwnershipRepository, TaskListQuery};

/// A task with a resolved owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOwnerReport {
    /// The task and its project.
    pub task: TaskRecord,
    /// The inferred owner.
    pub owner: PermissionHolder,
}

/// One page of the task listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOwnershipPage {
    /// Tasks on this page, each with its inferred owner.
    pub tasks: Vec<TaskOwnership>,
    /// Limit the page was built with, `None` when unbounded.
    pub limit: Option<usize>,
    /// Number of tasks skipped before this page.
    pub offset: usize,
    /// Whether more tasks follow this page.
    pub has_more: bool,
}

/// Result of checking one user's access to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAccessReport {
    /// The task and its project.
    pub task: TaskRecord,
    /// The checked account.
    pub user: UserAccount,
    /// The access decision and its explanation.
    pub decision: AccessDecision,
}

/// Application service answering ownership and access questions.
#[derive(Clone)]
pub struct OwnershipService {
    repository: Arc<dyn OwnershipRepository>,
}

impl OwnershipService {
    /// Creates a new ownership service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn OwnershipRepository>) -> Self {
        Self { repository }
    }

    /// Lists a page of tasks, each with its inferred owner.
    ///
    /// One extra row is fetched past a bounded page to tell whether more follow.
    pub async fn list_task_ownership(&self, query: TaskListQuery) -> AppResult<TaskOwnershipPage> {
        let fetch_query = TaskListQuery {
            limit: query.limit.map(|limit| limit.saturating_add(1)),
            ..query
        };
        let mut tasks = self.repository.list_tasks(fetch_query).await?;

        let has_more = query.limit.is_some_and(|limit| tasks.len() > limit);
        if let Some(limit) = query.limit {
            tasks.truncate(limit);
        }

        let mut page = TaskOwnershipPage {
            tasks: Vec::new(),
            limit: query.limit,
            offset: query.offset,
            has_more,
        };
        if tasks.is_empty() {
            return Ok(page);
        }

        let project_ids: Vec<ProjectId> = tasks
            .iter()
            .map(|task| task.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let holders = self
            .repository
            .list_permission_holders(&project_ids)
            .await?;

        page.tasks = tasks
            .into_iter()
            .map(|task| TaskOwnership::resolve(task, &holders))
            .collect();
        Ok(page)
    }

    /// Returns the fixed status catalogue.
    #[must_use]
    pub fn list_task_statuses(&self) -> &'static [TaskStatus] {
        TaskStatus::all()
    }

    /// Resolves the owner of one task.
    pub async fn task_owner(&self, task_id: TaskId) -> AppResult<TaskOwnerReport> {
        let task = self.require_task(task_id).await?;
        let holders = self
            .repository
            .list_permission_holders(&[task.project_id])
            .await?;

        let TaskOwnership { task, owner } = TaskOwnership::resolve(task, &holders);
        let owner = owner.ok_or_else(|| {
            AppError::NotFound(format!("task '{task_id}' has no resolvable owner"))
        })?;

        Ok(TaskOwnerReport { task, owner })
    }

    /// Checks whether a user can access a task through permission rows.
    pub async fn check_access(
        &self,
        task_id: TaskId,
        username: &Username,
    ) -> AppResult<TaskAccessReport> {
        let task = self.require_task(task_id).await?;
        let user = self
            .repository
            .find_user(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{username}' not found")))?;

        let direct_permissions = self
            .repository
            .list_direct_permissions(task.project_id, user.id)
            .await?;
        let group_permissions = self
            .repository
            .list_group_permissions(task.project_id, user.id)
            .await?;

        let decision =
            AccessDecision::evaluate(&user, &task, direct_permissions, group_permissions);

        Ok(TaskAccessReport {
            task,
            user,
            decision,
        })
    }

    async fn require_task(&self, task_id: TaskId) -> AppResult<TaskRecord> {
        self.repository
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task '{task_id}' not found")))
    }
}
