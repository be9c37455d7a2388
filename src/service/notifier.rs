use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::event::Event;

pub const DEFAULT_POPUP_COOLDOWN: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_POPUP_LEAD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupDecision {
    pub should_fire: bool,
    pub last_popup_time: DateTime<Utc>,
}

/// Decides whether a status tick should raise a popup.
///
/// Holds no state of its own: the last popup time is passed in and the
/// updated value handed back for the caller to commit.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    cooldown: TimeDelta,
    lead: TimeDelta,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_POPUP_COOLDOWN, DEFAULT_POPUP_LEAD)
    }
}

impl Notifier {
    pub fn new(cooldown: Duration, lead: Duration) -> Self {
        Self {
            cooldown: TimeDelta::from_std(cooldown).unwrap_or(TimeDelta::MAX),
            lead: TimeDelta::from_std(lead).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn maybe_fire(
        &self,
        event: &Event,
        now: DateTime<Utc>,
        last_popup_time: DateTime<Utc>,
    ) -> PopupDecision {
        let starting_soon = event.start_time - now <= self.lead;
        let cooled_down = now - last_popup_time >= self.cooldown;

        if starting_soon && cooled_down {
            PopupDecision {
                should_fire: true,
                last_popup_time: now,
            }
        } else {
            PopupDecision {
                should_fire: false,
                last_popup_time,
            }
        }
    }
}
