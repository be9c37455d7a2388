use async_trait::async_trait;
use tokio::process::Command;

use crate::models::event::Event;
use crate::service::popup::PopupNotifier;

const POPUP_STYLE: &str = "fg=#eba0ac";
const POPUP_TITLE: &str = "You got a meeting!";

/// Opens a `tmux display-popup` over the current pane.
pub struct TmuxPopup;

impl TmuxPopup {
    fn command(event: &Event) -> Command {
        let mut cmd = Command::new("tmux");
        cmd.args([
            "display-popup",
            "-S",
            POPUP_STYLE,
            "-w50%",
            "-h50%",
            "-d",
            "#{pane_current_path}",
            "-T",
            POPUP_TITLE,
            "echo",
        ])
        .arg(format!("Meeting: {:?}", event.title))
        .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PopupNotifier for TmuxPopup {
    async fn show(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let status = Self::command(event).status().await?;
        if !status.success() {
            return Err(format!("tmux display-popup exited with {status}").into());
        }
        Ok(())
    }
}
