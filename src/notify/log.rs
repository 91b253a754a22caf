use anyhow::Result;

use super::{Notification, Notifier};

/// Sink used when no webhook is configured: writes the message to the log.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        for embed in &notification.embeds {
            tracing::info!(
                title = %embed.title,
                content = notification.content.as_deref().unwrap_or_default(),
                "notification:\n{}",
                embed.description
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
