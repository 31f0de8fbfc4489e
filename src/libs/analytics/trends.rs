//! Completion trends: how many tasks were completed per period.
//!
//! A task's completion time is its `updated_at`; callers select completed
//! tasks updated inside the range (see `TaskFilter::CompletedBetween`).

use super::rollups::{start_of_month, start_of_week};
use crate::libs::config::WeekStart;
use crate::libs::task::Task;
use chrono::{Duration, Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TrendPeriod::Daily => "daily",
            TrendPeriod::Weekly => "weekly",
            TrendPeriod::Monthly => "monthly",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    pub label: String,
    pub count: usize,
}

impl TrendPeriod {
    fn bucket_start(self, date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        match self {
            TrendPeriod::Daily => date,
            TrendPeriod::Weekly => start_of_week(date, week_start),
            TrendPeriod::Monthly => start_of_month(date),
        }
    }

    fn next_bucket(self, bucket: NaiveDate) -> Option<NaiveDate> {
        match self {
            TrendPeriod::Daily => bucket.checked_add_signed(Duration::days(1)),
            TrendPeriod::Weekly => bucket.checked_add_signed(Duration::weeks(1)),
            TrendPeriod::Monthly => bucket.checked_add_months(Months::new(1)),
        }
    }

    fn label(self, bucket: NaiveDate) -> String {
        match self {
            TrendPeriod::Monthly => bucket.format("%Y-%m").to_string(),
            _ => bucket.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One point per period between `start` and `end` (inclusive), oldest first,
/// zero-filled. Only completed tasks whose completion date falls inside
/// `[start, end]` are counted.
pub fn completion_trends(
    tasks: &[Task],
    start: NaiveDate,
    end: NaiveDate,
    period: TrendPeriod,
    week_start: WeekStart,
) -> Vec<TrendPoint> {
    let mut points = Vec::new();
    if start > end {
        return points;
    }

    let mut bucket = period.bucket_start(start, week_start);
    while bucket <= end {
        points.push(TrendPoint {
            period_start: bucket,
            label: period.label(bucket),
            count: 0,
        });
        match period.next_bucket(bucket) {
            Some(next) => bucket = next,
            None => break,
        }
    }

    for task in tasks.iter().filter(|task| task.completed) {
        let completed_on = task.updated_at.date();
        if completed_on < start || completed_on > end {
            continue;
        }
        let key = period.bucket_start(completed_on, week_start);
        if let Ok(position) = points.binary_search_by(|point| point.period_start.cmp(&key)) {
            points[position].count += 1;
        }
    }

    points
}
