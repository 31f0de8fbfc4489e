//! Configuration management for caltask.
//!
//! The configuration is a small JSON document stored next to the database in
//! the platform-specific data directory. Every section is optional; a missing
//! file or a missing section falls back to defaults, so the application runs
//! without any setup.
//!
//! ## Configuration Structure
//!
//! - **Analytics**: default window length, week start day, category limits,
//!   heatmap bucket thresholds and productivity score weights
//!
//! The heatmap thresholds and score weights are business rules, not derived
//! values. They live here so they can be tuned without touching the
//! aggregation code.
//!
//! ## Usage Examples
//!
//! ```rust,ignore
//! use caltask::libs::config::Config;
//!
//! let config = Config::read()?;
//! let analytics = config.analytics_or_default();
//! println!("Window: {} days", analytics.window_days);
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use chrono::Weekday;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Upper bound for any analytics window, in days.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Represents a configurable module in the interactive setup.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// First day of a calendar week for weekly rollups and trends.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// Lower bounds of heatmap intensity levels 1 through 4.
///
/// A day whose completed count is below `thresholds[0]` has level 0; a count
/// at or above `thresholds[i]` (and below the next threshold) has level `i + 1`.
/// The defaults bucket counts as 0 | 1-2 | 3-4 | 5-6 | 7+.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HeatmapThresholds(pub [u32; 4]);

impl Default for HeatmapThresholds {
    fn default() -> Self {
        HeatmapThresholds([1, 3, 5, 7])
    }
}

/// Weights of the productivity score.
///
/// ```text
/// score = completion_rate_weight * completionRate
///       + throughput_weight      * min(averageTasksPerDay / throughput_target, 1)
///       + streak_weight          * min(currentStreak / streak_target, 1)
///       + high_priority_weight   * highPriorityCompletionRate
/// ```
///
/// With the defaults the four terms top out at 40, 30, 20 and 10 points.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreWeights {
    pub completion_rate_weight: f64,
    pub throughput_weight: f64,
    /// Tasks per day that earn the full throughput term.
    pub throughput_target: f64,
    pub streak_weight: f64,
    /// Streak length in days that earns the full streak term.
    pub streak_target: f64,
    pub high_priority_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            completion_rate_weight: 0.4,
            throughput_weight: 30.0,
            throughput_target: 3.0,
            streak_weight: 20.0,
            streak_target: 7.0,
            high_priority_weight: 0.1,
        }
    }
}

/// Analytics settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Window length used when a command does not specify one.
    pub window_days: u32,

    /// First day of the week for weekly statistics.
    pub week_start: WeekStart,

    /// Number of calendar weeks in the weekly rollup.
    pub weekly_periods: u32,

    /// Number of calendar months in the monthly rollup.
    pub monthly_periods: u32,

    /// How many categories the report lists.
    pub top_categories: usize,

    /// Title tokens shorter than this are not categories.
    pub min_category_length: usize,

    pub heatmap_thresholds: HeatmapThresholds,

    pub score_weights: ScoreWeights,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            window_days: 30,
            week_start: WeekStart::Sunday,
            weekly_periods: 12,
            monthly_periods: 6,
            top_categories: 10,
            min_category_length: 3,
            heatmap_thresholds: HeatmapThresholds::default(),
            score_weights: ScoreWeights::default(),
        }
    }
}

/// Main configuration container.
///
/// Unconfigured sections are omitted from the JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsConfig>,
}

impl Config {
    /// Reads the configuration from the platform data directory.
    ///
    /// A missing file is not an error and yields the default configuration.
    /// A file that exists but does not parse is reported as an error.
    ///
    /// The file lives at:
    /// - **Windows**: `%LOCALAPPDATA%\caltask\caltask\config.json`
    /// - **macOS**: `~/Library/Application Support/caltask/caltask/config.json`
    /// - **Linux**: `~/.local/share/caltask/caltask/config.json`
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    /// Reads the configuration from an explicit file path.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the configuration to the platform data directory as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file, if any.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    pub fn analytics_or_default(&self) -> AnalyticsConfig {
        self.analytics.clone().unwrap_or_default()
    }

    /// Runs the interactive configuration wizard.
    ///
    /// Starts from the current configuration (or defaults), lets the user pick
    /// the modules to configure and prompts for each of their settings with the
    /// existing values pre-filled.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![ConfigModule {
            key: "analytics".to_string(),
            name: "Analytics".to_string(),
        }];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "analytics" => {
                    let default = config.analytics_or_default();
                    msg_print!(Message::ConfigModuleAnalytics);

                    let window_days: u32 = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptWindowDays.to_string())
                        .default(default.window_days)
                        .validate_with(|days: &u32| {
                            if (1..=MAX_WINDOW_DAYS).contains(days) {
                                Ok(())
                            } else {
                                Err(Message::WindowDaysRange(MAX_WINDOW_DAYS).to_string())
                            }
                        })
                        .interact_text()?;

                    let week_starts = [WeekStart::Sunday, WeekStart::Monday];
                    let week_start_index = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptWeekStart.to_string())
                        .items(&["Sunday", "Monday"])
                        .default(week_starts.iter().position(|w| *w == default.week_start).unwrap_or(0))
                        .interact()?;

                    let top_categories: usize = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptTopCategories.to_string())
                        .default(default.top_categories)
                        .interact_text()?;

                    config.analytics = Some(AnalyticsConfig {
                        window_days,
                        week_start: week_starts[week_start_index],
                        top_categories,
                        ..default
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
