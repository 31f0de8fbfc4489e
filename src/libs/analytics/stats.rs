//! Completion and per-priority statistics.

use super::percentage;
use crate::libs::task::{Priority, Task};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: f64,
    /// Not completed and scheduled before `now`.
    pub overdue_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityStat {
    pub priority: Priority,
    pub total: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

pub fn completion_stats(tasks: &[Task], now: NaiveDateTime) -> CompletionStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let overdue_tasks = tasks.iter().filter(|task| task.is_overdue(now)).count();

    CompletionStats {
        total_tasks,
        completed_tasks,
        completion_rate: percentage(completed_tasks, total_tasks),
        overdue_tasks,
    }
}

/// One record per priority, always in the order low, medium, high, urgent.
pub fn priority_stats(tasks: &[Task]) -> Vec<PriorityStat> {
    Priority::ALL
        .iter()
        .map(|&priority| {
            let (total, completed) = tasks
                .iter()
                .filter(|task| task.priority == priority)
                .fold((0, 0), |(total, completed), task| (total + 1, completed + usize::from(task.completed)));

            PriorityStat {
                priority,
                total,
                completed,
                completion_rate: percentage(completed, total),
            }
        })
        .collect()
}
