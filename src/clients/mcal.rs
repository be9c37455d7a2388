use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::clients::command::capture_stdout;
use crate::clients::lines::parse_lines;
use crate::error::Result;
use crate::models::event::Event;
use crate::service::event_source::EventSource;

/// Reads today's events through the `mcal` helper, which prints lines like
/// `09:00 Standup | Room 2` for the current day only.
pub struct McalSource {
    program: String,
    timezone: Tz,
}

impl McalSource {
    pub fn new(timezone: Tz) -> Self {
        Self {
            program: "mcal".to_string(),
            timezone,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl EventSource for McalSource {
    async fn events_for_window(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let output = capture_stdout(&self.program, ["list"]).await?;
        let today = now.with_timezone(&self.timezone).date_naive();
        parse_day_listing(&output, today, self.timezone)
    }
}

pub fn parse_day_listing(output: &str, day: NaiveDate, timezone: Tz) -> Result<Vec<Event>> {
    parse_lines("mcal", output, |line| parse_listing_line(line, day, timezone))
}

fn parse_listing_line(line: &str, day: NaiveDate, timezone: Tz) -> std::result::Result<Event, String> {
    let (time, title) = line
        .split_once(' ')
        .ok_or_else(|| "expected `HH:MM title`".to_string())?;
    let title = title.trim();
    if title.is_empty() {
        return Err("missing title".to_string());
    }

    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|err| format!("invalid time {time:?}: {err}"))?;
    let start = timezone
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .ok_or_else(|| format!("{day} {time} does not exist in {timezone}"))?;

    Ok(Event::new(start.with_timezone(&Utc), title))
}
