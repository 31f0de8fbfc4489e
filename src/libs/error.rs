//! Domain error types.
//!
//! Storage and command layers work with `anyhow::Result`; these enums describe
//! the failures that callers may want to match on (invalid recurrence rules,
//! attempts to expand a non-recurring task, malformed task input).

use thiserror::Error;

/// Errors raised while validating or expanding a recurrence rule.
///
/// Validation happens before expansion starts. The expansion loop itself
/// never fails; hitting the occurrence cap is a silent truncation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("recurrence interval must be at least 1, got {0}")]
    InvalidInterval(u32),

    #[error("recurrence count must be at least 1, got {0}")]
    InvalidCount(u32),

    #[error("weekday index {0} is out of range (expected 0-6, Sunday = 0)")]
    InvalidWeekday(u8),

    #[error("task {0} is not recurring")]
    NotRecurring(i64),
}

/// Errors raised while accepting task input at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("task {0} not found")]
    NotFound(i64),

    #[error("invalid date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDate(String),

    #[error("unknown priority '{0}', expected low, medium, high or urgent")]
    InvalidPriority(String),

    #[error("unknown recurrence type '{0}', expected none, daily, weekly, monthly or yearly")]
    InvalidRecurrenceType(String),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
}
