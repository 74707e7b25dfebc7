use std::str::FromStr;

use chrono::{DateTime, Utc};
use ownerscope_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{ProjectId, TaskId};

/// Processing status codes stored by the external application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Waiting for a processing node.
    Queued,
    /// Currently processing.
    Running,
    /// Processing ended with an error.
    Failed,
    /// Processing finished successfully.
    Completed,
    /// Processing was canceled by a user.
    Canceled,
}

impl TaskStatus {
    /// Returns the stored status code.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Queued => 10,
            Self::Running => 20,
            Self::Failed => 30,
            Self::Completed => 40,
            Self::Canceled => 50,
        }
    }

    /// Returns the human-readable status name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Failed => "FAILED",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns the full catalogue in ascending code order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TaskStatus] = &[
            TaskStatus::Queued,
            TaskStatus::Running,
            TaskStatus::Failed,
            TaskStatus::Completed,
            TaskStatus::Canceled,
        ];

        ALL
    }

    /// Resolves a stored code, if it is part of the catalogue.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.code() == code)
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    /// Parses either a numeric code (`"40"`) or a name (`"completed"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let resolved = match trimmed.parse::<i32>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::all()
                .iter()
                .copied()
                .find(|status| status.name().eq_ignore_ascii_case(trimmed)),
        };

        resolved.ok_or_else(|| AppError::Validation(format!("unknown task status '{value}'")))
    }
}

/// Renders a raw status column as a display name.
///
/// Codes outside the catalogue render as `Unknown (<code>)`.
#[must_use]
pub fn describe_status(code: Option<i32>) -> String {
    match code {
        Some(code) => TaskStatus::from_code(code)
            .map(|status| status.name().to_owned())
            .unwrap_or_else(|| format!("Unknown ({code})")),
        None => "Unknown".to_owned(),
    }
}

/// Task row joined with its project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Task key.
    pub id: TaskId,
    /// Processing-node task uuid, empty until the task is submitted.
    pub uuid: String,
    /// Optional task label.
    pub name: Option<String>,
    /// Owning project key.
    pub project_id: ProjectId,
    /// Owning project name.
    pub project_name: String,
    /// Whether the project is publicly viewable.
    pub project_is_public: bool,
    /// Raw processing status code.
    pub status: Option<i32>,
    /// When the task was created, used as its processing date.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Returns the status display name.
    #[must_use]
    pub fn status_name(&self) -> String {
        describe_status(self.status)
    }

    /// Returns whole days elapsed between the processing date and `now`.
    #[must_use]
    pub fn days_since_processed(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days()
    }
}
