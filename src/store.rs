use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::types::Post;

/// Reads and rewrites one JSON dataset per channel.
///
/// Loading tries the published remote snapshot first, then the local
/// file, then gives up with an empty dataset; each step logs and falls
/// through on failure. Saving replaces the whole file.
pub struct DatasetStore {
    client: reqwest::Client,
    data_dir: PathBuf,
    remote_base: Option<String>,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>, remote_base: Option<String>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client for remote snapshots")?;

        Ok(Self {
            client,
            data_dir,
            remote_base,
        })
    }

    fn dataset_path(&self, channel_name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", channel_name))
    }

    pub async fn load(&self, channel_name: &str) -> Vec<Post> {
        if let Some(posts) = self.load_remote(channel_name).await {
            return posts;
        }
        if let Some(posts) = self.load_local(channel_name) {
            return posts;
        }
        debug!("No existing dataset for {}, starting empty", channel_name);
        Vec::new()
    }

    async fn load_remote(&self, channel_name: &str) -> Option<Vec<Post>> {
        let base = self.remote_base.as_deref()?;
        let url = format!("{}/{}.json", base, channel_name);

        let result: Result<Vec<Post>> = async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            Ok(response.json().await?)
        }
        .await;

        match result {
            Ok(posts) => {
                debug!(
                    "Loaded {} records for {} from remote snapshot",
                    posts.len(),
                    channel_name
                );
                Some(posts)
            }
            Err(e) => {
                warn!(
                    "Remote snapshot unavailable for {} ({:#}), trying local copy",
                    channel_name, e
                );
                None
            }
        }
    }

    fn load_local(&self, channel_name: &str) -> Option<Vec<Post>> {
        let path = self.dataset_path(channel_name);
        if !path.exists() {
            return None;
        }
        match read_dataset(&path) {
            Ok(posts) => Some(posts),
            Err(e) => {
                warn!(
                    "Could not read local dataset {}: {:#}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Full rewrite of the channel's file; indented UTF-8 JSON with
    /// non-ASCII characters written literally.
    pub fn save(&self, channel_name: &str, posts: &[Post]) -> Result<()> {
        let path = self.dataset_path(channel_name);
        let json = serde_json::to_string_pretty(posts)
            .with_context(|| format!("Failed to serialize dataset for {}", channel_name))?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved {} records to {}", posts.len(), path.display());
        Ok(())
    }
}

fn read_dataset(path: &Path) -> Result<Vec<Post>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
