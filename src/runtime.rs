use std::io;
use std::sync::Arc;

use tracing::info;

use crate::cli::{Settings, SourceKind};
use crate::clients::gcalcli::GcalcliSource;
use crate::clients::mcal::McalSource;
use crate::clients::tmux::TmuxPopup;
use crate::config::SchedulerConfig;
use crate::service::event_source::EventSource;
use crate::service::popup::{DisabledPopup, PopupNotifier};
use crate::tasks::scheduler::Scheduler;

pub fn build_config(settings: &Settings) -> crate::error::Result<SchedulerConfig> {
    let source: Arc<dyn EventSource> = match settings.source {
        SourceKind::Gcalcli => Arc::new(GcalcliSource::new(settings.timezone)),
        SourceKind::Mcal => Arc::new(McalSource::new(settings.timezone)),
    };
    let popup: Arc<dyn PopupNotifier> = if settings.popup_enabled {
        Arc::new(TmuxPopup)
    } else {
        Arc::new(DisabledPopup)
    };

    SchedulerConfig::builder(source)
        .status_refresh_interval(settings.status_interval)
        .cache_refresh_interval(settings.cache_interval)
        .popup_cooldown(settings.popup_cooldown)
        .title_width(settings.title_width)
        .label(settings.label.clone())
        .popup(popup)
        .build()
}

/// Runs the scheduler until SIGINT or SIGTERM, then stops it.
pub async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut scheduler = Scheduler::new(build_config(&settings)?);
    scheduler.start().await?;

    let waited = wait_for_shutdown().await;
    info!("shutdown requested");
    scheduler.stop().await;
    waited?;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
