//! Identifier types for rows of the external task-management schema.
//!
//! Tasks are keyed by UUID; projects and users by 32-bit serial keys.
//! Account names follow Django's username rule.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ownerscope_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum username length accepted by the external application.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Length of the canonical hyphenated UUID text form.
const TASK_ID_TEXT_LENGTH: usize = 36;

/// Identifier of a processing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Wraps a key read from storage.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying key value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    /// Accepts only the canonical hyphenated form
    /// (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AppError::Validation(format!(
                "task id must be a hyphenated UUID, got '{value}'"
            ))
        };

        if !is_canonical_uuid(value) {
            return Err(invalid());
        }

        Uuid::try_parse(value).map(Self).map_err(|_| invalid())
    }
}

impl Display for TaskId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.hyphenated())
    }
}

fn is_canonical_uuid(value: &str) -> bool {
    value.len() == TASK_ID_TEXT_LENGTH
        && value.bytes().enumerate().all(|(index, byte)| match index {
            8 | 13 | 18 | 23 => byte == b'-',
            _ => byte.is_ascii_hexdigit(),
        })
}

/// Identifier of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(i32);

impl ProjectId {
    /// Wraps a key read from storage.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying key value.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i32);

impl UserId {
    /// Wraps a key read from storage.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying key value.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

/// Validated account name.
///
/// Accepts 1 to 150 characters made of letters, digits and `@ . + - _`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::Validation(
                "username must not be empty".to_owned(),
            ));
        }

        if value.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "username must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if let Some(invalid) = value
            .chars()
            .find(|character| !is_username_character(*character))
        {
            return Err(AppError::Validation(format!(
                "username contains invalid character '{invalid}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Username {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

fn is_username_character(character: char) -> bool {
    character.is_alphanumeric() || matches!(character, '@' | '.' | '+' | '-' | '_')
}
