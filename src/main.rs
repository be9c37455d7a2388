#![allow(non_snake_case)]

use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use meetingBar::cli::{Cli, Settings};
use meetingBar::config::AppConfig;
use meetingBar::runtime;

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // stdout belongs to the status bar.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    // Keys missing from the file fall back to the environment.
    let file = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(file) => file.with_env_fallback(),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => AppConfig::default().with_env_fallback(),
    };

    let settings = match Settings::resolve(cli, &file) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = runtime::run(settings).await {
        error!(error = %err, "meetingBar exited with an error");
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
