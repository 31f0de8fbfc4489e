//! Display implementation for caltask messages.
//!
//! All user-facing text lives in this one `match`, so wording stays
//! consistent across commands and every new variant needs an explicit
//! formatting decision.
//!
//! ```rust,ignore
//! use caltask::libs::messages::Message;
//! use caltask::msg_success;
//!
//! msg_success!(Message::TaskCreated(7, "Write report".to_string()));
//! // ✅ Task #7 created: Write report
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id, title) => format!("Task #{} created: {}", id, title),
            Message::TaskUpdated(id) => format!("Task #{} updated", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted", id),
            Message::TaskNotFound(id) => format!("Task #{} not found", id),
            Message::TaskCompleted(id) => format!("Task #{} marked as completed", id),
            Message::TaskReopened(id) => format!("Task #{} marked as not completed", id),
            Message::TaskMoved(id, position) => format!("Task #{} moved to position {}", id, position),
            Message::TasksNotFound => "No tasks found".to_string(),
            Message::TasksHeader(range) => format!("Tasks: {}", range),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),
            Message::ConfirmDeleteInstances(count) => format!("The task has {} generated instances. Delete them as well?", count),
            Message::NoChangesDetected => "No changes detected".to_string(),
            Message::PromptTaskTitle => "Title".to_string(),
            Message::PromptTaskDate => "Date (YYYY-MM-DD [HH:MM])".to_string(),
            Message::PromptTaskPriority => "Priority".to_string(),
            Message::PromptTaskCompleted => "Completed".to_string(),
            Message::TaskDetailsHeader(id) => format!("Task #{}", id),

            // === RECURRENCE MESSAGES ===
            Message::TaskNotRecurring(id) => format!("Task #{} is not a recurring task", id),
            Message::InstancesGenerated(count, id) => format!("Generated {} instances of task #{}", count, id),
            Message::InstancesRemoved(count, id) => format!("Removed {} instances of task #{}", count, id),
            Message::NoInstancesInRange(id) => format!("Task #{} has no occurrences in the selected range", id),
            Message::RecurrenceOptionsWithoutType => "Recurrence options require --repeat".to_string(),
            Message::InvalidDateRange(from, to) => format!("Invalid date range: {} is after {}", from, to),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigModuleAnalytics => "Analytics settings".to_string(),
            Message::ConfirmDeleteConfig => "Reset the configuration to defaults?".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptWindowDays => "Default analytics window (days)".to_string(),
            Message::WindowDaysRange(max) => format!("Window must be between 1 and {} days", max),
            Message::PromptWeekStart => "First day of the week".to_string(),
            Message::PromptTopCategories => "Number of top categories to show".to_string(),

            // === ANALYTICS MESSAGES ===
            Message::StatsHeader(start, end, days) => format!("Statistics for {} to {} ({} days)", start, end, days),
            Message::TrendsHeader(period, start, end) => format!("Completion trends ({}) for {} to {}", period, start, end),
            Message::ProductivityScore(score) => format!("Productivity score: {:.2} / 100", score),
            Message::StreakSummary(current, longest, last) => match last {
                Some(date) => format!("Current streak: {} days (last completion {}), longest: {} days", current, date, longest),
                None => format!("Current streak: {} days, longest: {} days", current, longest),
            },
            Message::AverageTasksPerDay(average) => format!("Average tasks per day: {:.2}", average),
            Message::NoCompletedTasks => "No completed tasks in this period".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export completed: {}", path),

            // === GENERIC MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };

        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_are_interpolated() {
        assert_eq!(Message::TaskCreated(3, "Gym".to_string()).to_string(), "Task #3 created: Gym");
        assert_eq!(Message::ProductivityScore(27.3).to_string(), "Productivity score: 27.30 / 100");
        assert_eq!(
            Message::StreakSummary(2, 5, Some("2024-01-04".to_string())).to_string(),
            "Current streak: 2 days (last completion 2024-01-04), longest: 5 days"
        );
    }
}
