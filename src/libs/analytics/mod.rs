//! Task analytics: completion statistics, rollups, heatmap, streaks,
//! categories and the productivity score.
//!
//! Everything here is a pure function of an in-memory task list. The caller
//! fetches the tasks created inside an [`AnalyticsWindow`] and hands them to
//! [`AnalyticsAggregator::aggregate`], which runs every sub-computation over
//! the same list and bundles the results into an [`AnalyticsReport`].
//!
//! ## Sub-computations
//!
//! | Field               | Module        |
//! |---------------------|---------------|
//! | `completionStats`   | [`stats`]     |
//! | `priorityStats`     | [`stats`]     |
//! | `dailyStats`        | [`rollups`]   |
//! | `weeklyStats`       | [`rollups`]   |
//! | `monthlyStats`      | [`rollups`]   |
//! | `heatmapData`       | [`heatmap`]   |
//! | `streakData`        | [`streaks`]   |
//! | `topCategories`     | [`categories`]|
//! | `productivityScore` | [`score`]     |
//!
//! Completion trends ([`trends`]) work on a different input (completed tasks
//! selected by update time) and are computed separately.
//!
//! ## Empty input
//!
//! No sub-computation fails. An empty task list produces zero counts, zero
//! rates and a zero score; rates are never divided by zero.

pub mod categories;
pub mod heatmap;
pub mod rollups;
pub mod score;
pub mod stats;
pub mod streaks;
pub mod trends;

use crate::libs::config::{AnalyticsConfig, MAX_WINDOW_DAYS};
use crate::libs::formatter::{end_of_day, start_of_day};
use crate::libs::task::{Priority, Task};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use categories::CategoryCount;
pub use heatmap::HeatmapCell;
pub use rollups::{DailyStat, MonthlyStat, WeeklyStat};
pub use stats::{CompletionStats, PriorityStat};
pub use streaks::StreakData;
pub use trends::{TrendPeriod, TrendPoint};

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage rounded to two decimals, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// The calendar days analytics are computed over.
///
/// A window of `days` days ends on the reference date and includes it, so a
/// 30-day window ending on 2024-01-30 starts on 2024-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
}

impl AnalyticsWindow {
    /// Window of `days` days (clamped to 1..=365) ending on `now`'s date.
    pub fn ending_at(now: NaiveDateTime, days: u32) -> Self {
        let days = days.clamp(1, MAX_WINDOW_DAYS);
        let end_date = now.date();
        let start_date = end_date - Duration::days(i64::from(days) - 1);
        AnalyticsWindow { start_date, end_date, days }
    }

    pub fn start(&self) -> NaiveDateTime {
        start_of_day(self.start_date)
    }

    /// Inclusive end instant (last moment of the end date).
    pub fn end(&self) -> NaiveDateTime {
        end_of_day(self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Every date of the window, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start_date;
        (0..i64::from(self.days)).map(move |offset| start + Duration::days(offset))
    }
}

/// The full analytics bundle, serialized with the response field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub period: AnalyticsWindow,
    pub completion_stats: CompletionStats,
    pub priority_stats: Vec<PriorityStat>,
    pub daily_stats: Vec<DailyStat>,
    pub weekly_stats: Vec<WeeklyStat>,
    pub monthly_stats: Vec<MonthlyStat>,
    pub heatmap_data: Vec<HeatmapCell>,
    pub streak_data: StreakData,
    pub top_categories: Vec<CategoryCount>,
    pub average_tasks_per_day: f64,
    pub productivity_score: f64,
}

/// Runs the analytics sub-computations with a given configuration.
pub struct AnalyticsAggregator<'a> {
    config: &'a AnalyticsConfig,
}

impl<'a> AnalyticsAggregator<'a> {
    pub fn new(config: &'a AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Computes the report for `tasks`, which must already be restricted to
    /// tasks created within `window`. `now` decides overdue status and anchors
    /// the weekly and monthly rollups.
    pub fn aggregate(&self, tasks: &[Task], window: &AnalyticsWindow, now: NaiveDateTime) -> AnalyticsReport {
        let config = self.config;

        let completion_stats = stats::completion_stats(tasks, now);
        let priority_stats = stats::priority_stats(tasks);
        let daily_stats = rollups::daily_stats(tasks, window);
        let weekly_stats = rollups::weekly_stats(tasks, now, config.week_start, config.weekly_periods);
        let monthly_stats = rollups::monthly_stats(tasks, now, config.monthly_periods);
        let heatmap_data = heatmap::heatmap(&daily_stats, &config.heatmap_thresholds);
        let streak_data = streaks::streaks(&daily_stats);
        let top_categories = categories::top_categories(tasks, config.top_categories, config.min_category_length);
        let per_day = tasks_per_day(completion_stats.total_tasks, window.days);
        let average_tasks_per_day = average_tasks_per_day(completion_stats.total_tasks, window.days);

        let high_priority_rate = priority_stats
            .iter()
            .find(|stat| stat.priority == Priority::High)
            .map_or(0.0, |stat| stat.completion_rate);

        let productivity_score = score::productivity_score(
            &score::ScoreInputs {
                completion_rate: completion_stats.completion_rate,
                average_tasks_per_day: per_day,
                current_streak: streak_data.current_streak,
                high_priority_completion_rate: high_priority_rate,
            },
            &config.score_weights,
        );

        debug!(
            tasks = tasks.len(),
            days = window.days,
            score = productivity_score,
            "computed analytics report"
        );

        AnalyticsReport {
            period: *window,
            completion_stats,
            priority_stats,
            daily_stats,
            weekly_stats,
            monthly_stats,
            heatmap_data,
            streak_data,
            top_categories,
            average_tasks_per_day,
            productivity_score,
        }
    }
}

/// Tasks per window day, unrounded; 0 for an empty window.
pub fn tasks_per_day(total: usize, window_days: u32) -> f64 {
    if total == 0 || window_days == 0 {
        0.0
    } else {
        total as f64 / f64::from(window_days)
    }
}

/// Tasks per window day, rounded to two decimals for reporting.
pub fn average_tasks_per_day(total: usize, window_days: u32) -> f64 {
    round2(tasks_per_day(total, window_days))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn window_is_inclusive_and_clamped() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap().and_hms_opt(15, 0, 0).unwrap();
        let window = AnalyticsWindow::ending_at(now, 30);
        assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(window.dates().count(), 30);
        assert!(window.contains(now.date()));

        assert_eq!(AnalyticsWindow::ending_at(now, 1000).days, 365);
        assert_eq!(AnalyticsWindow::ending_at(now, 0).days, 1);
    }

    #[test]
    fn rounding_and_rates() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(average_tasks_per_day(0, 30), 0.0);
        assert_eq!(average_tasks_per_day(10, 30), 0.33);
        assert!((tasks_per_day(10, 30) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(tasks_per_day(3, 0), 0.0);
    }

    #[test]
    fn ten_tasks_six_completed() {
        let config = AnalyticsConfig::default();
        let now = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap().and_hms_opt(20, 0, 0).unwrap();
        let window = AnalyticsWindow::ending_at(now, 30);
        let created = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let tasks: Vec<Task> = (0..10)
            .map(|i| fixtures::task_at(i, created, i < 6, Priority::Medium))
            .collect();

        let report = AnalyticsAggregator::new(&config).aggregate(&tasks, &window, now);

        assert_eq!(report.completion_stats.total_tasks, 10);
        assert_eq!(report.completion_stats.completed_tasks, 6);
        assert_eq!(report.completion_stats.completion_rate, 60.0);
        assert_eq!(report.completion_stats.overdue_tasks, 4);
        assert_eq!(report.daily_stats.len(), 30);
        assert_eq!(report.heatmap_data.len(), 30);
        assert_eq!(report.weekly_stats.len(), 12);
        assert_eq!(report.monthly_stats.len(), 6);
        assert_eq!(report.average_tasks_per_day, 0.33);
        assert_eq!(report.streak_data.current_streak, 0);

        let medium = report.priority_stats.iter().find(|s| s.priority == Priority::Medium).unwrap();
        assert_eq!(medium.total, 10);
        assert_eq!(medium.completion_rate, 60.0);

        // 0.4 * 60 + 30 * ((10 / 30) / 3); only the score itself is rounded
        assert_eq!(report.productivity_score, 27.33);
        assert!(report.productivity_score >= 0.0 && report.productivity_score <= 100.0);
    }

    #[test]
    fn empty_report_is_all_zero() {
        let config = AnalyticsConfig::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let window = AnalyticsWindow::ending_at(now, 7);
        let report = AnalyticsAggregator::new(&config).aggregate(&[], &window, now);

        assert_eq!(report.completion_stats, CompletionStats::default());
        assert_eq!(report.priority_stats.len(), 4);
        assert!(report.daily_stats.iter().all(|d| d.tasks_created == 0));
        assert!(report.top_categories.is_empty());
        assert_eq!(report.streak_data, StreakData::default());
        assert_eq!(report.productivity_score, 0.0);
    }

    #[test]
    fn report_serializes_with_camel_case_fields() {
        let config = AnalyticsConfig::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let window = AnalyticsWindow::ending_at(now, 3);
        let report = AnalyticsAggregator::new(&config).aggregate(&[], &window, now);
        let json = serde_json::to_value(&report).unwrap();

        for field in ["completionStats", "priorityStats", "dailyStats", "weeklyStats", "monthlyStats", "heatmapData", "streakData", "topCategories", "averageTasksPerDay", "productivityScore"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(json["period"]["days"], 3);
    }
}
