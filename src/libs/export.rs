//! Analytics export.
//!
//! - **CSV**: one row per window day with creation, completion and heatmap
//!   columns, ready for a spreadsheet.
//! - **JSON**: the complete [`AnalyticsReport`] with its camelCase field names.
//!
//! Without an explicit path the file is written to the current directory as
//! `caltask_export_<timestamp>.<ext>`.

use super::analytics::AnalyticsReport;
use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// A CSV row: one day of the analytics window.
#[derive(Debug, Serialize)]
struct DailyRow {
    date: String,
    tasks_created: usize,
    tasks_completed: usize,
    completion_rate: f64,
    heatmap_level: u8,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "caltask_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes `report` in the configured format.
    pub fn export(&self, report: &AnalyticsReport) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.export_csv(report)?,
            ExportFormat::Json => self.export_json(report)?,
        }

        debug!(path = %self.output_path.display(), format = self.format.extension(), "exported analytics");
        Ok(())
    }

    fn export_csv(&self, report: &AnalyticsReport) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;

        for (day, cell) in report.daily_stats.iter().zip(&report.heatmap_data) {
            wtr.serialize(DailyRow {
                date: day.date.format("%Y-%m-%d").to_string(),
                tasks_created: day.tasks_created,
                tasks_completed: day.tasks_completed,
                completion_rate: day.completion_rate,
                heatmap_level: cell.level,
            })?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn export_json(&self, report: &AnalyticsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }
}
