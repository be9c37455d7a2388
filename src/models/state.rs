use chrono::{DateTime, Utc};

use crate::models::event::EventCache;

/// Everything the two scheduler loops share. Lives behind a single mutex.
#[derive(Debug, Clone)]
pub struct SchedulerState {
    pub event_cache: EventCache,
    pub last_popup_time: DateTime<Utc>,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            event_cache: EventCache::new(),
            last_popup_time: DateTime::UNIX_EPOCH,
        }
    }
}
