pub mod compose;
pub mod discord;
pub mod log;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use compose::{MessageTemplate, Placeholders};
pub use discord::DiscordNotifier;
pub use log::LogNotifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
}

/// One composed message, in Discord webhook shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl Notification {
    /// Description of the first embed, or `""`.
    pub fn description(&self) -> &str {
        self.embeds.first().map(|e| e.description.as_str()).unwrap_or_default()
    }
}

/// What happened to a source's notification this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Posted,
    Skipped,
    Failed,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Discord sink when a webhook is configured, log sink otherwise.
pub fn sink_for(webhook: Option<&str>) -> Box<dyn Notifier> {
    match webhook.map(str::trim).filter(|w| !w.is_empty()) {
        Some(url) => Box::new(DiscordNotifier::new(url.to_string())),
        None => Box::new(LogNotifier),
    }
}

/// Sends and maps the transport result onto a [`DeliveryStatus`]. Never fails.
pub async fn deliver(notifier: &dyn Notifier, notification: &Notification) -> DeliveryStatus {
    match notifier.send(notification).await {
        Ok(()) => DeliveryStatus::Posted,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), sink = notifier.name(), "notification delivery failed");
            DeliveryStatus::Failed
        }
    }
}
