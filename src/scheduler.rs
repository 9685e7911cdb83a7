use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::fetch::MessageSource;
use crate::orchestrator::Orchestrator;

/// Runs scrape passes on a cron schedule.
pub struct ScrapeScheduler {
    inner: JobScheduler,
}

impl ScrapeScheduler {
    pub async fn new() -> Result<Self> {
        let inner = JobScheduler::new()
            .await
            .context("Failed to create job scheduler")?;
        Ok(Self { inner })
    }

    /// Schedule recurring passes and start ticking. Overlap is not a
    /// concern: passes are short next to any sane cron interval, and the
    /// reconciler is idempotent anyway.
    pub async fn start<S>(&self, cron_expr: &str, orchestrator: Arc<Orchestrator<S>>) -> Result<()>
    where
        S: MessageSource + 'static,
    {
        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let orchestrator = orchestrator.clone();
            Box::pin(async move {
                info!("Starting scheduled scrape pass");
                orchestrator.run().await;
            })
        })
        .with_context(|| format!("Failed to create scrape job from cron '{}'", cron_expr))?;

        self.inner
            .add(job)
            .await
            .context("Failed to add scrape job")?;
        self.inner
            .start()
            .await
            .context("Failed to start scheduler")?;

        info!("Scrape pass scheduled with cron: {}", cron_expr);
        Ok(())
    }
}
