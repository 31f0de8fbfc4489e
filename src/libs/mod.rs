//! Core library modules.
//!
//! - **Domain**: task records, recurrence expansion, analytics, errors
//! - **Infrastructure**: configuration, data directory, message catalogue
//! - **Presentation**: terminal tables, date formatting, export

pub mod analytics;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod messages;
pub mod recurrence;
pub mod task;
pub mod view;
