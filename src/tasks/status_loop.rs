use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crate::models::event::next_event;
use crate::tasks::context::TickContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Cancelled,
    NoEvents,
    Rendered,
    PopupLaunched,
}

/// One status tick: render the next event, then let the notifier decide on a
/// popup. The popup runs in the background and its result is only logged.
pub async fn status_tick(ctx: &TickContext, now: DateTime<Utc>) -> StatusOutcome {
    if ctx.cancel.is_cancelled() {
        return StatusOutcome::Cancelled;
    }

    let (events, last_popup_time) = {
        let state = ctx.state.lock().await;
        (state.event_cache.snapshot(), state.last_popup_time)
    };

    let next = next_event(&events, now);
    if let Err(err) = ctx.renderer.line(&ctx.format.render(next, now)) {
        error!(error = %err, "failed to write status line");
    }

    let Some(event) = next else {
        return StatusOutcome::NoEvents;
    };

    let decision = ctx.notifier.maybe_fire(event, now, last_popup_time);
    if !decision.should_fire {
        return StatusOutcome::Rendered;
    }

    {
        let mut state = ctx.state.lock().await;
        if decision.last_popup_time > state.last_popup_time {
            state.last_popup_time = decision.last_popup_time;
        }
    }

    info!(title = %event.title, starts_at = %event.start_time, "showing meeting popup");
    let popup = Arc::clone(&ctx.popup);
    let cancel = ctx.cancel.clone();
    let event = event.clone();
    ctx.spawn_popup(async move {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => debug!("popup abandoned, scheduler stopping"),
            result = popup.show(&event) => {
                if let Err(err) = result {
                    debug!(error = %err, "popup failed");
                }
            }
        }
    });

    StatusOutcome::PopupLaunched
}

pub async fn run_status_loop(ctx: Arc<TickContext>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                debug!("status loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                status_tick(&ctx, Utc::now()).await;
            }
        }
    }
}
