//! SQLite persistence for caltask.
//!
//! The database lives in the platform data directory next to the
//! configuration file. Opening it always brings the schema up to date through
//! the [`migrations`] manager.
//!
//! ```rust,ignore
//! use caltask::db::tasks::Tasks;
//! use caltask::libs::task::{NewTask, TaskFilter};
//!
//! let mut tasks = Tasks::new()?;
//! let task = tasks.insert(&NewTask::new("Review PR", date))?;
//! let today = tasks.fetch(TaskFilter::DateRange(from, to))?;
//! ```

/// Connection setup.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Task repository: CRUD, per-day ordering and recurring instances.
pub mod tasks;
