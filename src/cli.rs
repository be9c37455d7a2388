use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};

use crate::config::{
    AppConfig, DEFAULT_CACHE_REFRESH_INTERVAL, DEFAULT_STATUS_REFRESH_INTERVAL, DEFAULT_TIMEZONE,
};
use crate::error::{CalendarError, Result};
use crate::service::notifier::DEFAULT_POPUP_COOLDOWN;
use crate::service::status_format::{DEFAULT_LABEL, DEFAULT_TITLE_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Gcalcli,
    Mcal,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(value, true)
    }
}

/// Prints the next calendar event as a status line and pops up a reminder
/// right before it starts.
///
/// Flags override values from the file named by `CONFIG_FILE`.
#[derive(Debug, Default, Parser)]
#[command(version)]
pub struct Cli {
    /// Calendar backend to poll [default: gcalcli]
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Seconds between status lines [default: 5]
    #[arg(long)]
    pub status_interval: Option<u64>,

    /// Seconds between calendar refreshes [default: 600]
    #[arg(long)]
    pub cache_interval: Option<u64>,

    /// Minimum seconds between two popups [default: 300]
    #[arg(long)]
    pub popup_cooldown: Option<u64>,

    /// IANA timezone the calendar backend prints times in [default: Europe/Copenhagen]
    #[arg(long)]
    pub timezone: Option<Tz>,

    /// Maximum characters of an event title in the status line [default: 20]
    #[arg(long)]
    pub title_width: Option<usize>,

    /// Text in front of the next event [default: "Next event"]
    #[arg(long)]
    pub label: Option<String>,

    /// Disable the tmux popup
    #[arg(long)]
    pub no_popup: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: SourceKind,
    pub status_interval: Duration,
    pub cache_interval: Duration,
    pub popup_cooldown: Duration,
    pub timezone: Tz,
    pub title_width: usize,
    pub label: String,
    pub popup_enabled: bool,
}

impl Settings {
    pub fn resolve(cli: Cli, file: &AppConfig) -> Result<Self> {
        let secs = |flag: Option<u64>, key: &str, default: Duration| -> Result<Duration> {
            Ok(match flag {
                Some(secs) => Duration::from_secs(secs),
                None => file
                    .get_parsed::<u64>(key)?
                    .map(Duration::from_secs)
                    .unwrap_or(default),
            })
        };

        let source = match cli.source {
            Some(source) => source,
            None => file
                .get_parsed::<SourceKind>("EVENT_SOURCE")?
                .unwrap_or(SourceKind::Gcalcli),
        };

        let timezone = match cli.timezone {
            Some(timezone) => timezone,
            None => match file.get("TIMEZONE") {
                Some(name) => name.parse::<Tz>().map_err(|err| {
                    CalendarError::Configuration(format!("invalid TIMEZONE {name:?}: {err}"))
                })?,
                None => DEFAULT_TIMEZONE,
            },
        };

        let title_width = match cli.title_width {
            Some(width) => width,
            None => file
                .get_parsed::<usize>("TITLE_WIDTH")?
                .unwrap_or(DEFAULT_TITLE_WIDTH),
        };

        let label = cli
            .label
            .or_else(|| file.get("STATUS_LABEL"))
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());

        let popup_enabled = !cli.no_popup && file.get_parsed::<bool>("POPUP")?.unwrap_or(true);

        Ok(Self {
            source,
            status_interval: secs(
                cli.status_interval,
                "STATUS_INTERVAL_SECS",
                DEFAULT_STATUS_REFRESH_INTERVAL,
            )?,
            cache_interval: secs(
                cli.cache_interval,
                "CACHE_INTERVAL_SECS",
                DEFAULT_CACHE_REFRESH_INTERVAL,
            )?,
            popup_cooldown: secs(
                cli.popup_cooldown,
                "POPUP_COOLDOWN_SECS",
                DEFAULT_POPUP_COOLDOWN,
            )?,
            timezone,
            title_width,
            label,
            popup_enabled,
        })
    }
}
