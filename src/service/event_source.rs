use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::event::Event;

/// Resolves every event in the window containing `now` (today, in the
/// source's own timezone).
///
/// Backend failures surface as `SourceUnavailable` or `ParseFailure`. The
/// scheduler does not distinguish between them.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn events_for_window(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;
}
