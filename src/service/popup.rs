use async_trait::async_trait;

use crate::models::event::Event;

/// Shows a meeting reminder to the user. Best effort: callers log and drop
/// any error.
#[async_trait]
pub trait PopupNotifier: Send + Sync {
    async fn show(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub struct DisabledPopup;

#[async_trait]
impl PopupNotifier for DisabledPopup {
    async fn show(&self, _event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
