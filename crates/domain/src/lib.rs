//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod identifiers;
mod ownership;
mod task;

pub use access::{AccessDecision, GroupPermissionGrant, UserAccount};
pub use identifiers::{ProjectId, TaskId, USERNAME_MAX_LENGTH, UserId, Username};
pub use ownership::{PermissionHolder, TaskOwnership, infer_owner};
pub use task::{TaskRecord, TaskStatus, describe_status};
