//! # caltask - calendar tasks with recurrence and analytics
//!
//! A command-line task planner backed by SQLite.
//!
//! ## Features
//!
//! - **Tasks**: dated tasks with priorities, completion and a manual order per day
//! - **Recurrence**: daily, weekly (optionally on chosen weekdays), monthly and
//!   yearly rules, expanded into concrete task instances on demand
//! - **Analytics**: completion and priority statistics, daily/weekly/monthly
//!   rollups, a contribution heatmap, streaks, title categories and a
//!   productivity score
//! - **Trends and export**: completion trends per day, week or month; CSV and
//!   JSON export of the analytics report
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caltask::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
