//! Owner inference over per-project permission rows.
//!
//! The external schema has no explicit task owner. The owner of a task is the
//! user holding the most distinct permissions on the task's project; ties go
//! to the lowest user id so the answer never depends on row order.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::{ProjectId, TaskRecord, UserId};

/// A user with at least one direct permission row on a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionHolder {
    /// Project the permissions apply to.
    pub project_id: ProjectId,
    /// Holder account key.
    pub user_id: UserId,
    /// Holder account name.
    pub username: String,
    /// Distinct permission codenames held on the project.
    pub permissions: BTreeSet<String>,
    /// Groups the holder belongs to.
    pub groups: BTreeSet<String>,
}

impl PermissionHolder {
    /// Returns the number of distinct permission codenames held.
    #[must_use]
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }
}

/// Picks the inferred owner among the holders of one project.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn infer_owner(holders: &[PermissionHolder]) -> Option<&PermissionHolder> {
    holders
        .iter()
        .max_by_key(|holder| (holder.permission_count(), Reverse(holder.user_id)))
}

/// A task together with its inferred owner, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOwnership {
    /// The task and its project.
    pub task: TaskRecord,
    /// Inferred owner, absent when the project has no permission holders.
    pub owner: Option<PermissionHolder>,
}

impl TaskOwnership {
    /// Resolves the owner of `task` from holders of any project.
    ///
    /// Holders of other projects are ignored.
    #[must_use]
    pub fn resolve(task: TaskRecord, holders: &[PermissionHolder]) -> Self {
        let candidates: Vec<PermissionHolder> = holders
            .iter()
            .filter(|holder| holder.project_id == task.project_id)
            .cloned()
            .collect();
        let owner = infer_owner(&candidates).cloned();

        Self { task, owner }
    }
}
