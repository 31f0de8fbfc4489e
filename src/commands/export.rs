use super::stats::build_report;
use crate::{
    db::tasks::Tasks,
    libs::{
        config::Config,
        export::{ExportFormat, Exporter},
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Window length in days, ending today (default from configuration, max 365)
    #[arg(short, long)]
    days: Option<u32>,
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,
    /// Output file (default: caltask_export_<timestamp>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let config = Config::read()?.analytics_or_default();
    let report = build_report(&Tasks::new()?, &config, args.days, Local::now().naive_local())?;

    let exporter = Exporter::new(args.format, args.output);
    exporter.export(&report)?;

    msg_success!(Message::ExportCompleted(exporter.output_path().display().to_string()));
    Ok(())
}
