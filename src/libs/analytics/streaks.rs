//! Completion streaks.
//!
//! A streak is a run of consecutive days with at least one completed task.
//! The walk goes from the most recent day backwards: the current streak is
//! the run touching the most recent day, the longest streak is the longest
//! run anywhere in the scanned range.

use super::rollups::DailyStat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Most recent day of the current streak; `None` when there is no current streak.
    pub last_completion_date: Option<NaiveDate>,
}

/// Streaks over `daily`, which must be ordered oldest first.
pub fn streaks(daily: &[DailyStat]) -> StreakData {
    let mut current_streak = 0;
    let mut longest_streak = 0;
    let mut running = 0;
    let mut in_current = true;
    let mut last_completion_date = None;

    for day in daily.iter().rev() {
        if day.tasks_completed > 0 {
            running += 1;
            longest_streak = longest_streak.max(running);
            if in_current {
                if current_streak == 0 {
                    last_completion_date = Some(day.date);
                }
                current_streak += 1;
            }
        } else {
            running = 0;
            in_current = false;
        }
    }

    StreakData {
        current_streak,
        longest_streak,
        last_completion_date,
    }
}
