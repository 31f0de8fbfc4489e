use crate::{
    db::tasks::Tasks,
    libs::{
        analytics::{trends::completion_trends, AnalyticsWindow, TrendPeriod, TrendPoint},
        config::{AnalyticsConfig, Config},
        formatter::format_date,
        messages::Message,
        task::TaskFilter,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct TrendsArgs {
    /// Range length in days, ending today (default from configuration, max 365)
    #[arg(short, long)]
    days: Option<u32>,
    #[arg(short, long, value_enum, default_value_t = TrendPeriod::Daily)]
    period: TrendPeriod,
    /// Print the points as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: TrendsArgs) -> Result<()> {
    let config = Config::read()?.analytics_or_default();
    let now = Local::now().naive_local();
    let window = AnalyticsWindow::ending_at(now, args.days.unwrap_or(config.window_days));
    let points = load_trends(&Tasks::new()?, &config, &window, args.period)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    msg_print!(
        Message::TrendsHeader(args.period.to_string(), format_date(window.start_date), format_date(window.end_date)),
        true
    );
    if points.iter().all(|point| point.count == 0) {
        msg_info!(Message::NoCompletedTasks);
        return Ok(());
    }
    View::trends(&points)?;
    Ok(())
}

/// Completion counts per period over `window`.
pub fn load_trends(tasks_db: &Tasks, config: &AnalyticsConfig, window: &AnalyticsWindow, period: TrendPeriod) -> Result<Vec<TrendPoint>> {
    let completed = tasks_db.fetch(TaskFilter::CompletedBetween(window.start(), window.end()))?;
    Ok(completion_trends(&completed, window.start_date, window.end_date, period, config.week_start))
}
