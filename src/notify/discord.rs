use super::{Notification, Notifier};
use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }


    async fn post(&self, notification: &Notification) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(notification)
                .send()
                .await;

            // Discord answers 204; redirects count as delivered too.
            let failure = match res {
                Ok(rsp) if rsp.status().is_success() || rsp.status().is_redirection() => return Ok(()),
                Ok(rsp) => anyhow!("Discord webhook HTTP error: {}", rsp.status()),
                Err(e) => anyhow!("Discord webhook request failed: {e}"),
            };

            if attempt >= self.max_retries {
                return Err(failure);
            }
            tracing::debug!(attempt, error = %failure, "retrying discord webhook");
            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
        }
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.post(notification).await
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}
