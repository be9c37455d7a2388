use tracing::warn;

use crate::error::{CalendarError, Result};
use crate::models::event::Event;

/// Parses one event per non-empty line.
///
/// Lines the parser rejects are logged and skipped. The whole output is only
/// rejected when it had content and not a single line parsed.
pub fn parse_lines<F>(source: &str, output: &str, mut parse_line: F) -> Result<Vec<Event>>
where
    F: FnMut(&str) -> std::result::Result<Event, String>,
{
    let mut events = Vec::new();
    let mut rejected = Vec::new();

    for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match parse_line(line) {
            Ok(event) => events.push(event),
            Err(reason) => {
                warn!(source, line, reason = %reason, "skipping unparsable calendar line");
                rejected.push(reason);
            }
        }
    }

    if events.is_empty() && !rejected.is_empty() {
        return Err(CalendarError::ParseFailure(format!(
            "{source}: none of {} lines parsed (first error: {})",
            rejected.len(),
            rejected[0]
        )));
    }

    Ok(events)
}
