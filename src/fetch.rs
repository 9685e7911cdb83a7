use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::types::{ChannelConfig, RawMessage};

/// A time-ordered source of raw channel messages, newest first.
///
/// Implemented by the HTTP gateway client in production and by in-memory
/// doubles in tests. The authenticated session lives behind the source.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn get_messages(&self, username: &str, limit: usize) -> Result<Vec<RawMessage>>;
}

/// Client for the message gateway fronting the Telegram session.
pub struct GatewaySource {
    client: reqwest::Client,
    base_url: String,
}

impl GatewaySource {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client for the message gateway")?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl MessageSource for GatewaySource {
    async fn get_messages(&self, username: &str, limit: usize) -> Result<Vec<RawMessage>> {
        let url = format!("{}/messages/{}", self.base_url, username);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await
            .with_context(|| format!("Gateway request failed for {}", username))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Gateway returned HTTP {} for {}", status, username);
        }

        response
            .json()
            .await
            .with_context(|| format!("Invalid gateway payload for {}", username))
    }
}

/// Fetches the recent-message window for one channel and drops messages
/// carrying neither text nor media. Errors carry channel context; the
/// orchestrator recovers them so one broken channel never aborts a run.
pub struct ChannelFetcher<S> {
    source: S,
    limit: usize,
}

impl<S: MessageSource> ChannelFetcher<S> {
    pub fn new(source: S, limit: usize) -> Self {
        Self { source, limit }
    }

    pub async fn fetch(&self, channel: &ChannelConfig) -> Result<Vec<RawMessage>> {
        let messages = self
            .source
            .get_messages(&channel.username, self.limit)
            .await
            .with_context(|| format!("Fetch failed for channel {}", channel.name))?;

        let total = messages.len();
        let kept: Vec<RawMessage> = messages.into_iter().filter(|m| !m.is_empty()).collect();
        debug!(
            "Fetched {} messages for {} ({} kept)",
            total,
            channel.name,
            kept.len()
        );
        Ok(kept)
    }
}
