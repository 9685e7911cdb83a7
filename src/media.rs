use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::MediaAttachment;

/// Best-effort public CDN used when the Bot API cannot resolve a file.
const CDN_BASE: &str = "https://cdn4.telesco.pe";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GetFileResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    #[serde(default)]
    file_path: Option<String>,
}

/// Resolves an attachment to a durable, publicly fetchable URL.
///
/// Strategies in order: Bot API `getFile` (when a token is configured),
/// then a public CDN guess from the bare file id. Failures never
/// propagate; a message keeps `media_url: null` at worst.
pub struct MediaResolver {
    client: reqwest::Client,
    bot_token: Option<String>,
    api_base: String,
}

impl MediaResolver {
    pub fn new(api_base: String, bot_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for media resolution")?;
        Ok(Self {
            client,
            bot_token,
            api_base,
        })
    }

    /// Resolve one attachment. `channel` is only for log context.
    pub async fn resolve(&self, media: Option<&MediaAttachment>, channel: &str) -> Option<String> {
        let media = media?;
        let file_id = media.file_id()?;

        if self.bot_token.is_some() {
            match self.resolve_via_bot_api(file_id).await {
                Ok(url) => {
                    debug!("Resolved file {} for {} via Bot API", file_id, channel);
                    return Some(url);
                }
                Err(e) => {
                    warn!(
                        "Bot API resolution failed for file {} in {}: {:#}",
                        file_id, channel, e
                    );
                }
            }
        }

        // Heuristic guess, not guaranteed reachable.
        warn!(
            "Falling back to public CDN URL for file {} in {}",
            file_id, channel
        );
        Some(format!("{}/file/{}.jpg", CDN_BASE, file_id))
    }

    async fn resolve_via_bot_api(&self, file_id: i64) -> Result<String> {
        let token = self
            .bot_token
            .as_deref()
            .context("No bot token configured")?;

        let url = format!("{}/bot{}/getFile", self.api_base, token);
        let response = self
            .client
            .get(&url)
            .query(&[("file_id", file_id.to_string())])
            .send()
            .await
            .context("getFile request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("getFile returned HTTP {}", status);
        }

        let body: GetFileResponse = response
            .json()
            .await
            .context("Failed to parse getFile response")?;

        if !body.ok {
            bail!(
                "getFile rejected: {}",
                body.description.as_deref().unwrap_or("no description")
            );
        }

        let file_path = body
            .result
            .and_then(|r| r.file_path)
            .context("getFile response missing file_path")?;

        Ok(format!("{}/file/bot{}/{}", self.api_base, token, file_path))
    }
}
