use std::future::Future;
use std::sync::{Arc, PoisonError};

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::SchedulerConfig;
use crate::models::state::SchedulerState;
use crate::service::event_source::EventSource;
use crate::service::notifier::Notifier;
use crate::service::popup::PopupNotifier;
use crate::service::renderer::Renderer;
use crate::service::status_format::StatusFormat;

/// Collaborators and shared state handed to both scheduler loops.
pub struct TickContext {
    pub(crate) state: Mutex<SchedulerState>,
    pub(crate) source: Arc<dyn EventSource>,
    pub(crate) renderer: Renderer,
    pub(crate) popup: Arc<dyn PopupNotifier>,
    pub(crate) notifier: Notifier,
    pub(crate) format: StatusFormat,
    pub(crate) cancel: CancellationToken,
    popups: std::sync::Mutex<JoinSet<()>>,
}

impl TickContext {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            state: Mutex::new(SchedulerState::default()),
            source: config.event_source,
            renderer: config.renderer,
            popup: config.popup,
            notifier: config.notifier,
            format: config.format,
            cancel: CancellationToken::new(),
            popups: std::sync::Mutex::new(JoinSet::new()),
        }
    }

    pub async fn state(&self) -> SchedulerState {
        self.state.lock().await.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs a popup in the background so the status loop keeps ticking while
    /// it is open. Finished popups are reaped on the way.
    pub(crate) fn spawn_popup<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut popups = self.popups.lock().unwrap_or_else(PoisonError::into_inner);
        while popups.try_join_next().is_some() {}
        popups.spawn(task);
    }

    /// Waits for every popup launched so far. Popups watch the cancellation
    /// token, so after [`cancel`](Self::cancel) this returns promptly.
    pub async fn join_popups(&self) {
        let mut popups = {
            let mut guard = self.popups.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        while let Some(result) = popups.join_next().await {
            if let Err(err) = result {
                warn!(error = %err, "popup task ended abnormally");
            }
        }
    }
}
