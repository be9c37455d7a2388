#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetingBar::error::{CalendarError, Result};
use meetingBar::models::event::Event;
use meetingBar::service::event_source::EventSource;
use meetingBar::service::popup::PopupNotifier;
use meetingBar::tasks::calendar_loop::UPDATING_MESSAGE;

/// Records every write as one entry.
#[derive(Clone, Default)]
pub struct CapturingWriter {
    writes: Arc<Mutex<Vec<String>>>,
}

impl CapturingWriter {
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.writes()
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .filter(|line| line != UPDATING_MESSAGE && !line.starts_with("error updating"))
            .collect()
    }
}

impl Write for CapturingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct FixedSource {
    events: Vec<Event>,
}

impl FixedSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for FixedSource {
    async fn events_for_window(&self, _now: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }
}

/// Plays back a queue of results, then keeps returning an empty day.
pub struct ScriptedSource {
    script: Mutex<VecDeque<std::result::Result<Vec<Event>, String>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<std::result::Result<Vec<Event>, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn events_for_window(&self, _now: DateTime<Utc>) -> Result<Vec<Event>> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(events)) => Ok(events),
            Some(Err(reason)) => Err(CalendarError::SourceUnavailable(reason)),
            None => Ok(Vec::new()),
        }
    }
}

/// Answers the first call immediately and stalls on every later one.
pub struct StallingSource {
    calls: AtomicUsize,
    stall: Duration,
}

impl StallingSource {
    pub fn new(stall: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            stall,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for StallingSource {
    async fn events_for_window(&self, _now: DateTime<Utc>) -> Result<Vec<Event>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            tokio::time::sleep(self.stall).await;
        }
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct RecordingPopup {
    shown: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingPopup {
    pub fn failing() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl PopupNotifier for RecordingPopup {
    async fn show(&self, event: &Event) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.shown.lock().unwrap().push(event.title.clone());
        if self.fail {
            return Err("tmux not running".into());
        }
        Ok(())
    }
}

/// A popup the user never closes.
#[derive(Default)]
pub struct PendingPopup {
    opened: AtomicUsize,
}

impl PendingPopup {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PopupNotifier for PendingPopup {
    async fn show(&self, _event: &Event) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Hands out two fixed collections in turn, forever.
pub struct AlternatingSource {
    first: Vec<Event>,
    second: Vec<Event>,
    calls: AtomicUsize,
}

impl AlternatingSource {
    pub fn new(first: Vec<Event>, second: Vec<Event>) -> Self {
        Self {
            first,
            second,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EventSource for AlternatingSource {
    async fn events_for_window(&self, _now: DateTime<Utc>) -> Result<Vec<Event>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Ok(self.first.clone())
        } else {
            Ok(self.second.clone())
        }
    }
}
