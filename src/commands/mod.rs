//! Command-line interface.
//!
//! Each subcommand lives in its own module exposing a clap `Args` struct and
//! a `cmd` function. [`Cli::menu`] parses the arguments and dispatches.

pub mod export;
pub mod init;
pub mod migrations;
pub mod recur;
pub mod stats;
pub mod task;
pub mod trends;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure caltask interactively")]
    Init(init::InitArgs),
    #[command(about = "Create, list, edit, complete, reorder and delete tasks")]
    Task(task::TaskArgs),
    #[command(about = "Generate the instances of a recurring task for a date range")]
    Recur(recur::RecurArgs),
    #[command(about = "Show the analytics report")]
    Stats(stats::StatsArgs),
    #[command(about = "Show completion trends")]
    Trends(trends::TrendsArgs),
    #[command(about = "Export the analytics report to CSV or JSON")]
    Export(export::ExportArgs),
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Recur(args) => recur::cmd(args),
            Commands::Stats(args) => stats::cmd(args),
            Commands::Trends(args) => trends::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}
