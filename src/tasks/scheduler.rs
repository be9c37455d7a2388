//! Drives the status line.
//!
//! Two loops share one [`TickContext`]: the calendar loop refreshes the event
//! cache from the configured source every `cache_refresh_interval`, and the
//! status loop renders the next event every `status_refresh_interval`. Both
//! check the same cancellation token before any side effect, and `stop`
//! waits for both loops and any open popup to exit, so nothing is written
//! once it returns.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::models::state::SchedulerState;
use crate::tasks::calendar_loop::{cache_tick, run_calendar_loop};
use crate::tasks::context::TickContext;
use crate::tasks::status_loop::{run_status_loop, status_tick};
use crate::tasks::task_runner::TaskRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
}

pub struct Scheduler {
    ctx: Arc<TickContext>,
    status_refresh_interval: Duration,
    cache_refresh_interval: Duration,
    lifecycle: Lifecycle,
    tasks: TaskRunner,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let status_refresh_interval = config.status_refresh_interval;
        let cache_refresh_interval = config.cache_refresh_interval;
        Self {
            ctx: Arc::new(TickContext::new(config)),
            status_refresh_interval,
            cache_refresh_interval,
            lifecycle: Lifecycle::Created,
            tasks: TaskRunner::new(),
        }
    }

    /// Refreshes the cache and emits a status line right away, then starts
    /// both periodic loops. A scheduler runs at most once.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), SchedulerError> {
        match self.lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Running => return Err(SchedulerError::AlreadyRunning),
            Lifecycle::Stopped => return Err(SchedulerError::AlreadyStopped),
        }

        info!(
            status_interval_ms = self.status_refresh_interval.as_millis() as u64,
            cache_interval_ms = self.cache_refresh_interval.as_millis() as u64,
            "starting scheduler"
        );

        cache_tick(&self.ctx, Utc::now()).await;
        status_tick(&self.ctx, Utc::now()).await;

        self.tasks.spawn(
            "calendar_loop",
            run_calendar_loop(Arc::clone(&self.ctx), self.cache_refresh_interval),
        );
        self.tasks.spawn(
            "status_loop",
            run_status_loop(Arc::clone(&self.ctx), self.status_refresh_interval),
        );

        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Cancels both loops and any open popup and waits for them to exit.
    /// Calling it again, or before `start`, does nothing.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        self.ctx.cancel();
        self.tasks.join_all().await;
        self.ctx.join_popups().await;
        self.lifecycle = Lifecycle::Stopped;
        info!("scheduler stopped");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub async fn state(&self) -> SchedulerState {
        self.ctx.state().await
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Running && !self.ctx.is_cancelled() {
            warn!("scheduler dropped while running; cancelling loops");
            self.ctx.cancel();
        }
    }
}
