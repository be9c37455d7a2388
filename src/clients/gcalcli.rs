use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::clients::ansi::strip_ansi;
use crate::clients::command::capture_stdout;
use crate::clients::lines::parse_lines;
use crate::error::{CalendarError, Result};
use crate::models::event::Event;
use crate::service::event_source::EventSource;

const DATE_FORMAT: &str = "%Y-%m-%d";
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
// Printed instead of an agenda on a free day.
const NO_EVENTS_MARKER: &str = "No Events Found";

/// Reads today's agenda through `gcalcli search`.
pub struct GcalcliSource {
    program: String,
    timezone: Tz,
}

impl GcalcliSource {
    pub fn new(timezone: Tz) -> Self {
        Self {
            program: "gcalcli".to_string(),
            timezone,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl EventSource for GcalcliSource {
    async fn events_for_window(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let today = now.with_timezone(&self.timezone).date_naive();
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| CalendarError::SourceUnavailable(format!("no day after {today}")))?;

        let from = today.format(DATE_FORMAT).to_string();
        let to = tomorrow.format(DATE_FORMAT).to_string();
        let output = capture_stdout(&self.program, ["search", "*", from.as_str(), to.as_str()]).await?;

        parse_agenda(&strip_ansi(&output), self.timezone)
    }
}

/// Parses `gcalcli` agenda lines of the form `2026-02-10  09:00  Title`.
/// The `No Events Found...` banner reads as an empty day.
pub fn parse_agenda(output: &str, timezone: Tz) -> Result<Vec<Event>> {
    let agenda = output
        .lines()
        .filter(|line| !line.trim_start().starts_with(NO_EVENTS_MARKER))
        .collect::<Vec<_>>()
        .join("\n");
    parse_lines("gcalcli", &agenda, |line| parse_agenda_line(line, timezone))
}

fn parse_agenda_line(line: &str, timezone: Tz) -> std::result::Result<Event, String> {
    let mut tokens = line.split_whitespace();
    let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
        return Err("expected a date and a time".to_string());
    };
    let title = tokens.collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return Err("missing title".to_string());
    }

    let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), LINE_TIMESTAMP_FORMAT)
        .map_err(|err| format!("invalid timestamp {date} {time}: {err}"))?;
    let local = timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("{naive} does not exist in {timezone}"))?;

    Ok(Event::new(local.with_timezone(&Utc), title))
}
