//! Shared primitives for all Rust crates in Ownerscope.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Ownerscope crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed identifier or query parameter.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing database cannot be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error detail is safe to show to API callers.
    #[must_use]
    pub fn is_client_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}
