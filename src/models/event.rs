use std::sync::Arc;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub start_time: DateTime<Utc>,
    pub title: String,
}

impl Event {
    pub fn new(start_time: DateTime<Utc>, title: impl Into<String>) -> Self {
        Self {
            start_time,
            title: title.into(),
        }
    }
}

// Returns the earliest event starting at or after `after`. Ties resolve to
// whichever event the scan meets first.
pub fn next_event(events: &[Event], after: DateTime<Utc>) -> Option<&Event> {
    events
        .iter()
        .filter(|event| event.start_time >= after)
        .min_by_key(|event| event.start_time)
}

/// The most recently resolved events for today.
///
/// The collection is an immutable snapshot. A refresh swaps in a whole new
/// snapshot, so a reader holding the previous one keeps seeing it in full.
#[derive(Debug, Clone)]
pub struct EventCache {
    events: Arc<[Event]>,
}

impl Default for EventCache {
    fn default() -> Self {
        Self {
            events: Arc::from(Vec::new()),
        }
    }
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, events: Vec<Event>) {
        self.events = Arc::from(events);
    }

    pub fn snapshot(&self) -> Arc<[Event]> {
        Arc::clone(&self.events)
    }

    pub fn next_event(&self, after: DateTime<Utc>) -> Option<&Event> {
        next_event(&self.events, after)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    #[test]
    fn next_event_picks_earliest_upcoming() {
        let events = vec![
            Event::new(at(15, 0), "retro"),
            Event::new(at(9, 0), "standup"),
            Event::new(at(11, 30), "lunch"),
            Event::new(at(10, 0), "design review"),
        ];

        let next = next_event(&events, at(9, 30)).unwrap();
        assert_eq!(next.title, "design review");
    }

    #[test]
    fn next_event_includes_event_starting_exactly_now() {
        let events = vec![Event::new(at(10, 0), "planning")];
        let next = next_event(&events, at(10, 0)).unwrap();
        assert_eq!(next.title, "planning");
    }

    #[test]
    fn next_event_is_none_when_everything_has_started() {
        let events = vec![
            Event::new(at(8, 0), "early"),
            Event::new(at(9, 0), "standup"),
        ];
        assert!(next_event(&events, at(9, 0) + Duration::seconds(1)).is_none());
    }

    #[test]
    fn next_event_on_empty_collection_is_none() {
        assert!(next_event(&[], at(0, 0)).is_none());
        assert!(EventCache::new().next_event(at(23, 59)).is_none());
    }

    #[test]
    fn next_event_is_idempotent() {
        let events = vec![
            Event::new(at(12, 0), "a"),
            Event::new(at(12, 0), "b"),
            Event::new(at(13, 0), "c"),
        ];
        let first = next_event(&events, at(11, 0)).cloned();
        let second = next_event(&events, at(11, 0)).cloned();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().start_time, at(12, 0));
    }

    #[test]
    fn next_event_never_skips_an_earlier_candidate() {
        let events: Vec<Event> = (0..24)
            .rev()
            .map(|hour| Event::new(at(hour, 15), format!("event {hour}")))
            .collect();

        for hour in 0..24 {
            let after = at(hour, 0);
            let next = next_event(&events, after).unwrap();
            assert!(next.start_time >= after);
            assert!(
                events
                    .iter()
                    .filter(|event| event.start_time >= after)
                    .all(|event| event.start_time >= next.start_time)
            );
        }
    }

    #[test]
    fn replace_swaps_whole_collection_without_touching_old_snapshot() {
        let mut cache = EventCache::new();
        cache.replace(vec![Event::new(at(9, 0), "old")]);
        let old = cache.snapshot();

        cache.replace(vec![
            Event::new(at(10, 0), "new"),
            Event::new(at(11, 0), "newer"),
        ]);

        assert_eq!(old.len(), 1);
        assert_eq!(old[0].title, "old");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.next_event(at(0, 0)).unwrap().title, "new");
    }
}
