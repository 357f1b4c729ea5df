use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid identifier {0:?}")]
    InvalidId(String),
}

/// Rejected user input. The operation that produced it must not have created
/// or modified anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("points must be a number, got {0:?}")]
    NotANumber(String),

    #[error("points must be a positive integer, got {0}")]
    NonPositivePoints(i64),

    #[error("a deadline is required")]
    MissingDeadline,

    #[error("invalid deadline {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0} is still active; disable it before deleting")]
    StillActive(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} has already been completed")]
    AlreadyCompleted(String),
}
