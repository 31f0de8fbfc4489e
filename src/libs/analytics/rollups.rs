//! Daily, weekly and monthly rollups of task creation and completion.
//!
//! All three group tasks by their creation date. A task counts towards
//! `tasksCompleted` of the period it was *created* in when it is completed.

use super::{percentage, round2, AnalyticsWindow};
use crate::libs::config::WeekStart;
use crate::libs::task::Task;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: NaiveDate,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStat {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub completion_rate: f64,
    pub average_tasks_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    /// `YYYY-MM`
    pub month: String,
    pub month_start: NaiveDate,
    pub days_in_month: u32,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub completion_rate: f64,
    pub average_tasks_per_day: f64,
}

/// Counts of tasks created in `[from, to]` and of those that are completed.
fn created_between(tasks: &[Task], from: NaiveDate, to: NaiveDate) -> (usize, usize) {
    tasks
        .iter()
        .filter(|task| {
            let created = task.created_at.date();
            created >= from && created <= to
        })
        .fold((0, 0), |(created, completed), task| (created + 1, completed + usize::from(task.completed)))
}

/// One record per window day, oldest first, zero-filled.
pub fn daily_stats(tasks: &[Task], window: &AnalyticsWindow) -> Vec<DailyStat> {
    let mut days: Vec<DailyStat> = window
        .dates()
        .map(|date| DailyStat {
            date,
            tasks_created: 0,
            tasks_completed: 0,
            completion_rate: 0.0,
        })
        .collect();

    for task in tasks {
        let offset = (task.created_at.date() - window.start_date).num_days();
        if offset < 0 {
            continue;
        }
        if let Some(day) = days.get_mut(offset as usize) {
            day.tasks_created += 1;
            if task.completed {
                day.tasks_completed += 1;
            }
        }
    }

    for day in &mut days {
        day.completion_rate = percentage(day.tasks_completed, day.tasks_created);
    }

    days
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let first = week_start.weekday().num_days_from_monday();
    let current = date.weekday().num_days_from_monday();
    let offset = (7 + current - first) % 7;
    date - Duration::days(i64::from(offset))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(month_start: NaiveDate) -> u32 {
    month_start
        .checked_add_months(Months::new(1))
        .map_or(31, |next| (next - month_start).num_days() as u32)
}

/// The `periods` most recent calendar weeks, the last one containing `now`,
/// oldest first.
pub fn weekly_stats(tasks: &[Task], now: NaiveDateTime, week_start: WeekStart, periods: u32) -> Vec<WeeklyStat> {
    let current_week = start_of_week(now.date(), week_start);

    (0..periods)
        .rev()
        .map(|weeks_back| {
            let week_start = current_week - Duration::weeks(i64::from(weeks_back));
            let week_end = week_start + Duration::days(6);
            let (created, completed) = created_between(tasks, week_start, week_end);

            WeeklyStat {
                week_start,
                week_end,
                tasks_created: created,
                tasks_completed: completed,
                completion_rate: percentage(completed, created),
                average_tasks_per_day: round2(created as f64 / 7.0),
            }
        })
        .collect()
}

/// The `periods` most recent calendar months, the last one containing `now`,
/// oldest first. Averages divide by the real length of each month.
pub fn monthly_stats(tasks: &[Task], now: NaiveDateTime, periods: u32) -> Vec<MonthlyStat> {
    let current_month = start_of_month(now.date());

    (0..periods)
        .rev()
        .filter_map(|months_back| current_month.checked_sub_months(Months::new(months_back)))
        .map(|month_start| {
            let days = days_in_month(month_start);
            let month_end = month_start + Duration::days(i64::from(days) - 1);
            let (created, completed) = created_between(tasks, month_start, month_end);

            MonthlyStat {
                month: month_start.format("%Y-%m").to_string(),
                month_start,
                days_in_month: days,
                tasks_created: created,
                tasks_completed: completed,
                completion_rate: percentage(completed, created),
                average_tasks_per_day: round2(created as f64 / f64::from(days)),
            }
        })
        .collect()
}
