use std::ffi::OsStr;

use tokio::process::Command;
use tracing::debug;

use crate::error::{CalendarError, Result};

/// Runs `program` to completion and returns its stdout.
pub async fn capture_stdout<I, S>(program: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|err| CalendarError::SourceUnavailable(format!("failed to run {program}: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CalendarError::SourceUnavailable(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8(output.stdout).map_err(|err| {
        CalendarError::ParseFailure(format!("{program} produced non UTF-8 output: {err}"))
    })?;
    debug!(program, bytes = stdout.len(), "captured calendar output");
    Ok(stdout)
}
