use crate::{
    db::tasks::Tasks,
    libs::{
        analytics::{AnalyticsAggregator, AnalyticsReport, AnalyticsWindow},
        config::{AnalyticsConfig, Config},
        formatter::format_date,
        messages::Message,
        task::TaskFilter,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Window length in days, ending today (default from configuration, max 365)
    #[arg(short, long)]
    days: Option<u32>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let config = Config::read()?.analytics_or_default();
    let report = build_report(&Tasks::new()?, &config, args.days, Local::now().naive_local())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    msg_print!(
        Message::StatsHeader(
            format_date(report.period.start_date),
            format_date(report.period.end_date),
            report.period.days
        ),
        true
    );
    View::report(&report)?;

    let streak = &report.streak_data;
    msg_info!(Message::StreakSummary(
        streak.current_streak,
        streak.longest_streak,
        streak.last_completion_date.map(format_date)
    ));
    msg_info!(Message::AverageTasksPerDay(report.average_tasks_per_day));
    msg_info!(Message::ProductivityScore(report.productivity_score));
    Ok(())
}

/// Loads the tasks created in the window ending at `now` and aggregates them.
pub fn build_report(tasks_db: &Tasks, config: &AnalyticsConfig, days: Option<u32>, now: NaiveDateTime) -> Result<AnalyticsReport> {
    let window = AnalyticsWindow::ending_at(now, days.unwrap_or(config.window_days));
    let tasks = tasks_db.fetch(TaskFilter::CreatedBetween(window.start(), window.end()))?;

    Ok(AnalyticsAggregator::new(config).aggregate(&tasks, &window, now))
}
