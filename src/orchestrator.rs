use std::collections::{HashMap, HashSet};

use tracing::{error, info};

use crate::fetch::{ChannelFetcher, MessageSource};
use crate::normalize::Normalizer;
use crate::reconcile::reconcile;
use crate::store::DatasetStore;
use crate::types::{ChannelConfig, Post};

/// Aggregated counters for one scrape pass.
#[derive(Debug, Default)]
pub struct RunStats {
    pub messages_fetched: usize,
    pub messages_new: usize,
    pub media_count: usize,
    pub media_types: HashMap<String, usize>,
    pub errors: usize,
}

/// Drives one pass over all configured channels: fetch, normalize,
/// reconcile against the stored dataset, save. Channels are processed
/// sequentially and independently; a failing channel is counted and
/// skipped, never fatal.
pub struct Orchestrator<S> {
    fetcher: ChannelFetcher<S>,
    normalizer: Normalizer,
    store: DatasetStore,
    channels: Vec<ChannelConfig>,
    max_entries: Option<usize>,
}

impl<S: MessageSource> Orchestrator<S> {
    pub fn new(
        fetcher: ChannelFetcher<S>,
        normalizer: Normalizer,
        store: DatasetStore,
        channels: Vec<ChannelConfig>,
        max_entries: Option<usize>,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            store,
            channels,
            max_entries,
        }
    }

    pub async fn run(&self) -> RunStats {
        let mut stats = RunStats::default();

        for channel in &self.channels {
            info!("Scanning {}...", channel.name);
            self.process_channel(channel, &mut stats).await;
        }

        info!(
            "Run complete: {} fetched, {} new, {} with media, {} errors",
            stats.messages_fetched, stats.messages_new, stats.media_count, stats.errors
        );
        if !stats.media_types.is_empty() {
            let mut kinds: Vec<_> = stats.media_types.iter().collect();
            kinds.sort();
            let histogram: Vec<String> =
                kinds.iter().map(|(k, n)| format!("{}={}", k, n)).collect();
            info!("Media types: {}", histogram.join(" "));
        }

        stats
    }

    async fn process_channel(&self, channel: &ChannelConfig, stats: &mut RunStats) {
        let raw = match self.fetcher.fetch(channel).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error in {}: {:#}", channel.name, e);
                stats.errors += 1;
                return;
            }
        };

        let mut incoming: Vec<Post> = Vec::with_capacity(raw.len());
        for message in &raw {
            incoming.push(self.normalizer.normalize(message, channel).await);
        }

        stats.messages_fetched += incoming.len();
        for post in &incoming {
            if let Some(kind) = &post.tipo_medio {
                stats.media_count += 1;
                *stats.media_types.entry(kind.clone()).or_insert(0) += 1;
            }
        }

        let existing = self.store.load(&channel.name).await;
        let known: HashSet<i64> = existing.iter().map(|p| p.id).collect();
        let new_count = incoming.iter().filter(|p| !known.contains(&p.id)).count();
        stats.messages_new += new_count;

        let reconciled = reconcile(existing, incoming, self.max_entries);

        match self.store.save(&channel.name, &reconciled) {
            Ok(()) => info!(
                "{}: {} new messages, {} stored",
                channel.name,
                new_count,
                reconciled.len()
            ),
            Err(e) => {
                // Not retried this run; the next pass re-derives the dataset.
                error!("Error saving {}: {:#}", channel.name, e);
                stats.errors += 1;
            }
        }
    }
}
