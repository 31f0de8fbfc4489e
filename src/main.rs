use caltask::commands::Cli;
use caltask::msg_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let default_filter = if std::env::var("CALTASK_DEBUG").is_ok() { "caltask=debug" } else { "caltask=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    match Cli::menu() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Catalogue errors already carry the icon.
            let text = format!("{:#}", error);
            msg_error!(text.trim_start_matches("❌ "));
            ExitCode::FAILURE
        }
    }
}
