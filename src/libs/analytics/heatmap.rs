//! Contribution-style heatmap of completed tasks per day.

use super::rollups::DailyStat;
use crate::libs::config::HeatmapThresholds;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// Completed tasks among those created on `date`.
    pub count: usize,
    /// Intensity bucket, 0 through 4.
    pub level: u8,
}

/// Intensity level for a day's completed count.
pub fn heatmap_level(count: usize, thresholds: &HeatmapThresholds) -> u8 {
    thresholds.0.iter().filter(|&&threshold| count >= threshold as usize).count() as u8
}

pub fn heatmap(daily: &[DailyStat], thresholds: &HeatmapThresholds) -> Vec<HeatmapCell> {
    daily
        .iter()
        .map(|day| HeatmapCell {
            date: day.date,
            count: day.tasks_completed,
            level: heatmap_level(day.tasks_completed, thresholds),
        })
        .collect()
}
