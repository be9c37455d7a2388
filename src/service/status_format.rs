use chrono::{DateTime, TimeDelta, Utc};

use crate::models::event::Event;

pub const DEFAULT_TITLE_WIDTH: usize = 20;
pub const DEFAULT_LABEL: &str = "Next event";
pub const DEFAULT_NO_EVENTS_MESSAGE: &str = "No more events today... Yay! :D";

const ELLIPSIS: &str = "...";

/// Formats the time until an event, e.g. `"1 hour 30 minutes"`.
///
/// Hours are not reduced modulo 24, so a day away renders as
/// `"1 days 24 hour"`. Units are never pluralized or singularized; the status
/// bar consumers match on this exact shape.
pub fn human_duration(until: TimeDelta) -> String {
    let seconds = until.num_seconds().max(0);
    let days = seconds / 86_400;
    let hours = seconds / 3_600;
    let minutes = (seconds / 60) % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days} days"));
    }
    if hours > 0 {
        parts.push(format!("{hours} hour"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} minutes"));
    }
    parts.join(" ")
}

pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.chars().count() <= max_width {
        return title.to_string();
    }

    let keep = max_width.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[derive(Debug, Clone)]
pub struct StatusFormat {
    pub label: String,
    pub no_events_message: String,
    pub title_width: usize,
}

impl Default for StatusFormat {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            no_events_message: DEFAULT_NO_EVENTS_MESSAGE.to_string(),
            title_width: DEFAULT_TITLE_WIDTH,
        }
    }
}

impl StatusFormat {
    pub fn render(&self, next: Option<&Event>, now: DateTime<Utc>) -> String {
        match next {
            None => self.no_events_message.clone(),
            Some(event) => format!(
                "{}: {:?} in {}",
                self.label,
                truncate_title(&event.title, self.title_width),
                human_duration(event.start_time - now)
            ),
        }
    }
}
