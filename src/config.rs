use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;

use crate::clients::tmux::TmuxPopup;
use crate::error::{CalendarError, Result};
use crate::service::event_source::EventSource;
use crate::service::notifier::{DEFAULT_POPUP_COOLDOWN, DEFAULT_POPUP_LEAD, Notifier};
use crate::service::popup::PopupNotifier;
use crate::service::renderer::Renderer;
use crate::service::status_format::{
    DEFAULT_LABEL, DEFAULT_NO_EVENTS_MESSAGE, DEFAULT_TITLE_WIDTH, StatusFormat,
};

pub const DEFAULT_STATUS_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_CACHE_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Copenhagen;

// Room for at least one character of title next to the ellipsis.
const MIN_TITLE_WIDTH: usize = 4;

/// Everything a [`Scheduler`](crate::tasks::scheduler::Scheduler) needs.
/// Only obtainable through [`SchedulerConfig::builder`], which validates it.
pub struct SchedulerConfig {
    pub(crate) status_refresh_interval: Duration,
    pub(crate) cache_refresh_interval: Duration,
    pub(crate) event_source: Arc<dyn EventSource>,
    pub(crate) renderer: Renderer,
    pub(crate) popup: Arc<dyn PopupNotifier>,
    pub(crate) notifier: Notifier,
    pub(crate) format: StatusFormat,
}

impl SchedulerConfig {
    pub fn builder(event_source: Arc<dyn EventSource>) -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::new(event_source)
    }

    pub fn status_refresh_interval(&self) -> Duration {
        self.status_refresh_interval
    }

    pub fn cache_refresh_interval(&self) -> Duration {
        self.cache_refresh_interval
    }
}

/// Defaults: status every 5s, cache every 10min, 5min popup cooldown, popup
/// one minute ahead, 20 character titles, tmux popups, output on stdout.
pub struct SchedulerConfigBuilder {
    event_source: Arc<dyn EventSource>,
    status_refresh_interval: Duration,
    cache_refresh_interval: Duration,
    popup_cooldown: Duration,
    popup_lead: Duration,
    title_width: usize,
    label: String,
    no_events_message: String,
    output: Option<Box<dyn Write + Send>>,
    popup: Option<Arc<dyn PopupNotifier>>,
}

impl SchedulerConfigBuilder {
    fn new(event_source: Arc<dyn EventSource>) -> Self {
        Self {
            event_source,
            status_refresh_interval: DEFAULT_STATUS_REFRESH_INTERVAL,
            cache_refresh_interval: DEFAULT_CACHE_REFRESH_INTERVAL,
            popup_cooldown: DEFAULT_POPUP_COOLDOWN,
            popup_lead: DEFAULT_POPUP_LEAD,
            title_width: DEFAULT_TITLE_WIDTH,
            label: DEFAULT_LABEL.to_string(),
            no_events_message: DEFAULT_NO_EVENTS_MESSAGE.to_string(),
            output: None,
            popup: None,
        }
    }

    pub fn status_refresh_interval(mut self, interval: Duration) -> Self {
        self.status_refresh_interval = interval;
        self
    }

    pub fn cache_refresh_interval(mut self, interval: Duration) -> Self {
        self.cache_refresh_interval = interval;
        self
    }

    pub fn popup_cooldown(mut self, cooldown: Duration) -> Self {
        self.popup_cooldown = cooldown;
        self
    }

    pub fn popup_lead(mut self, lead: Duration) -> Self {
        self.popup_lead = lead;
        self
    }

    pub fn title_width(mut self, width: usize) -> Self {
        self.title_width = width;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn no_events_message(mut self, message: impl Into<String>) -> Self {
        self.no_events_message = message.into();
        self
    }

    pub fn output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn popup(mut self, popup: Arc<dyn PopupNotifier>) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn build(self) -> Result<SchedulerConfig> {
        if self.status_refresh_interval.is_zero() {
            return Err(CalendarError::Configuration(
                "status refresh interval must be greater than zero".to_string(),
            ));
        }
        if self.cache_refresh_interval.is_zero() {
            return Err(CalendarError::Configuration(
                "cache refresh interval must be greater than zero".to_string(),
            ));
        }
        if self.title_width < MIN_TITLE_WIDTH {
            return Err(CalendarError::Configuration(format!(
                "title width must be at least {MIN_TITLE_WIDTH}, got {}",
                self.title_width
            )));
        }

        let renderer = match self.output {
            Some(output) => Renderer::new(output),
            None => Renderer::stdout(),
        };

        Ok(SchedulerConfig {
            status_refresh_interval: self.status_refresh_interval,
            cache_refresh_interval: self.cache_refresh_interval,
            event_source: self.event_source,
            renderer,
            popup: self.popup.unwrap_or_else(|| Arc::new(TmuxPopup)),
            notifier: Notifier::new(self.popup_cooldown, self.popup_lead),
            format: StatusFormat {
                label: self.label,
                no_events_message: self.no_events_message,
                title_width: self.title_width,
            },
        })
    }
}

/// `KEY=VALUE` settings file, read from `CONFIG_FILE`.
///
/// Blank lines and `#` comments are ignored, an `export ` prefix is allowed
/// and values may be wrapped in single or double quotes. With
/// [`with_env_fallback`](Self::with_env_fallback), keys missing from the file
/// are looked up in the process environment.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
    env_fallback: bool,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CalendarError::Configuration(format!("cannot read {path}: {e}")))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(CalendarError::Configuration(format!(
                    "invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            let key = key.trim();
            let mut value = value.trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self {
            values,
            env_fallback: false,
        })
    }

    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| self.env_fallback.then(|| env::var(key).ok()).flatten())
    }

    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|err| {
                    CalendarError::Configuration(format!("invalid value {raw:?} for {key}: {err}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct NoEvents;

    #[async_trait]
    impl EventSource for NoEvents {
        async fn events_for_window(&self, _now: DateTime<Utc>) -> Result<Vec<Event>> {
            Ok(Vec::new())
        }
    }

    fn builder() -> SchedulerConfigBuilder {
        SchedulerConfig::builder(Arc::new(NoEvents))
    }

    #[test]
    fn builder_applies_documented_defaults() {
        let config = builder().build().unwrap();
        assert_eq!(config.status_refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.cache_refresh_interval(), Duration::from_secs(600));
        assert_eq!(config.format.title_width, 20);
    }

    #[test]
    fn zero_intervals_are_configuration_errors() {
        let status = builder().status_refresh_interval(Duration::ZERO).build();
        assert!(matches!(status, Err(CalendarError::Configuration(_))));

        let cache = builder().cache_refresh_interval(Duration::ZERO).build();
        assert!(matches!(cache, Err(CalendarError::Configuration(_))));
    }

    #[test]
    fn tiny_title_width_is_rejected() {
        assert!(matches!(
            builder().title_width(3).build(),
            Err(CalendarError::Configuration(_))
        ));
    }

    #[test]
    fn parses_env_style_file() {
        let config = AppConfig::parse(
            "# meetingBar\nexport EVENT_SOURCE=mcal\nSTATUS_LABEL=\"Up next\"\nTITLE_WIDTH='30'\n\n",
        )
        .unwrap();

        assert_eq!(config.get("EVENT_SOURCE").as_deref(), Some("mcal"));
        assert_eq!(config.get("STATUS_LABEL").as_deref(), Some("Up next"));
        assert_eq!(config.get_parsed::<usize>("TITLE_WIDTH").unwrap(), Some(30));
        assert_eq!(config.get_parsed::<usize>("MISSING").unwrap(), None);
    }

    #[test]
    fn rejects_lines_without_assignment() {
        assert!(matches!(
            AppConfig::parse("EVENT_SOURCE\n"),
            Err(CalendarError::Configuration(_))
        ));
    }

    #[test]
    fn env_fallback_fills_keys_missing_from_file() {
        let path = env::var("PATH").expect("PATH is set");

        assert_eq!(AppConfig::default().get("PATH"), None);
        assert_eq!(
            AppConfig::default().with_env_fallback().get("PATH"),
            Some(path)
        );

        let file = AppConfig::parse("PATH=/from/file\n")
            .unwrap()
            .with_env_fallback();
        assert_eq!(file.get("PATH").as_deref(), Some("/from/file"));
    }

    #[test]
    fn reports_unparsable_values() {
        let config = AppConfig::parse("STATUS_INTERVAL_SECS=soon\n").unwrap();
        assert!(config.get_parsed::<u64>("STATUS_INTERVAL_SECS").is_err());
    }
}
