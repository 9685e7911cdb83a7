mod config;
mod fetch;
mod media;
mod normalize;
mod orchestrator;
mod reconcile;
mod scheduler;
mod store;
mod timefmt;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetch::{ChannelFetcher, GatewaySource};
use crate::media::MediaResolver;
use crate::normalize::Normalizer;
use crate::orchestrator::Orchestrator;
use crate::scheduler::ScrapeScheduler;
use crate::store::DatasetStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telescan=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Channels: {}", config.channels.len());
    info!("  Fetch limit: {}", config.scrape.limit);
    info!("  Timezone: {}", config.scrape.timezone);
    info!("  Data dir: {}", config.storage.data_dir);
    info!(
        "  Bot token: {}",
        if config.telegram.bot_token.is_some() {
            "configured"
        } else {
            "absent (public fallback only)"
        }
    );

    // Any failure here is fatal; no channel is processed on a broken setup.
    let tz = config.timezone()?;
    let source = GatewaySource::new(config.telegram.gateway_url.clone())?;
    let fetcher = ChannelFetcher::new(source, config.scrape.limit);
    let resolver = MediaResolver::new(
        config.telegram.api_base.clone(),
        config.telegram.bot_token.clone(),
    )?;
    let normalizer = Normalizer::new(resolver, tz);
    let store = DatasetStore::new(
        config.storage.data_dir.clone(),
        config.storage.remote_base_url.clone(),
    )?;

    let orchestrator = Arc::new(Orchestrator::new(
        fetcher,
        normalizer,
        store,
        config.channels.clone(),
        config.storage.max_entries,
    ));

    match config.scrape.cron.as_deref() {
        Some(cron_expr) => {
            let scheduler = ScrapeScheduler::new().await?;
            scheduler.start(cron_expr, orchestrator).await?;

            info!("Polling on schedule; Ctrl-C to stop");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            info!("Shutting down");
        }
        None => {
            orchestrator.run().await;
        }
    }

    Ok(())
}
