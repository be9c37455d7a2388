use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::tasks::context::TickContext;

pub const UPDATING_MESSAGE: &str = "Updating event cache...";

/// Fetches the current window from the event source and swaps it into the
/// cache. The source call runs without the state lock held; on error the
/// cached events stay as they were.
pub async fn refresh_cache(ctx: &TickContext, now: DateTime<Utc>) -> Result<usize> {
    let events = ctx.source.events_for_window(now).await?;
    let count = events.len();

    ctx.state.lock().await.event_cache.replace(events);
    Ok(count)
}

/// One cache tick: announce, refresh, report failure. Abandons an in-flight
/// source call as soon as the scheduler is cancelled.
pub async fn cache_tick(ctx: &TickContext, now: DateTime<Utc>) {
    if ctx.cancel.is_cancelled() {
        return;
    }
    if let Err(err) = ctx.renderer.line(UPDATING_MESSAGE) {
        error!(error = %err, "failed to write status line");
    }

    let result = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => {
            debug!("cache refresh abandoned, scheduler stopping");
            return;
        }
        result = refresh_cache(ctx, now) => result,
    };

    match result {
        Ok(count) => info!(events = count, "event cache refreshed"),
        Err(err) => {
            error!(error = %err, "failed to refresh event cache, keeping previous events");
            if ctx.cancel.is_cancelled() {
                return;
            }
            if let Err(write_err) = ctx
                .renderer
                .line(&format!("error updating event cache: {err}"))
            {
                error!(error = %write_err, "failed to write status line");
            }
        }
    }
}

pub async fn run_calendar_loop(ctx: Arc<TickContext>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                debug!("calendar loop cancelled");
                break;
            }
            _ = ticker.tick() => cache_tick(&ctx, Utc::now()).await,
        }
    }
}
