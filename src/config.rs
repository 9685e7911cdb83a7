use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::types::ChannelConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default = "default_scrape_config")]
    pub scrape: ScrapeConfig,
    #[serde(default = "default_storage_config")]
    pub storage: StorageConfig,
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Message gateway exposing the pre-authenticated session.
    pub gateway_url: String,
    /// Bot token enabling the authenticated media-resolution strategy.
    /// Absence disables it; the BOT_TOKEN env var takes precedence.
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Cron expression for periodic runs; absent means a single pass.
    #[serde(default)]
    pub cron: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Base URL for the published snapshot tried before the local copy.
    #[serde(default)]
    pub remote_base_url: Option<String>,
    /// Oldest records are dropped once a dataset exceeds this length.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_limit() -> usize {
    20
}

fn default_timezone() -> String {
    "America/Havana".to_string()
}

fn default_data_dir() -> String {
    "data/provincias".to_string()
}

fn default_scrape_config() -> ScrapeConfig {
    ScrapeConfig {
        limit: default_limit(),
        timezone: default_timezone(),
        cron: None,
    }
}

fn default_storage_config() -> StorageConfig {
    StorageConfig {
        data_dir: default_data_dir(),
        remote_base_url: None,
        max_entries: None,
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.channels.is_empty() {
            bail!("Config lists no channels: {}", path.display());
        }

        // Reject a bad zone name up front rather than mid-run.
        config.timezone()?;

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if !token.is_empty() {
                config.telegram.bot_token = Some(token);
            }
        }

        Ok(config)
    }

    /// Target zone every record's local time is rendered in.
    pub fn timezone(&self) -> Result<Tz> {
        Tz::from_str(&self.scrape.timezone)
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", self.scrape.timezone, e))
    }
}
