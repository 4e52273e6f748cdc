use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use cron::Schedule;
use tokio::time::sleep;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tvs_fetcher::MetricFetcher;
use tvs_metrics::{FetchOutcome, UpdateMetrics};
use tvs_presence::{PublishOutcome, StatusPublisher};

/// Fetches the TVS and publishes it, once when the session becomes ready and
/// then on every firing of the schedule.
pub struct UpdateService {
    fetcher: MetricFetcher,
    publisher: StatusPublisher,
    schedule: Schedule,
    metrics: Arc<UpdateMetrics>,
}

impl UpdateService {
    pub const fn new(
        fetcher: MetricFetcher,
        publisher: StatusPublisher,
        schedule: Schedule,
        metrics: Arc<UpdateMetrics>,
    ) -> Self {
        Self {
            fetcher,
            publisher,
            schedule,
            metrics,
        }
    }

    pub async fn run_forever(self: Arc<Self>, shutdown: CancellationToken) -> Result<()> {
        tracing::info!("[UpdateService] ⏳ Waiting for the session to be ready...");
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("[UpdateService] Shutdown requested before the session was ready");
                return Ok(());
            }
            _ = self.publisher.session().wait_until_ready() => {}
        }

        self.run_cycle().await;
        tracing::info!(
            "[UpdateService] ✅ Bot is running. TVS will update on schedule `{}`",
            self.schedule
        );

        // Firings may overlap with a slow cycle, the tracker only lets us drain them on shutdown.
        let cycles = TaskTracker::new();
        let mut last_firing = Utc::now();

        loop {
            let reference = last_firing.max(Utc::now());
            let Some(next_firing) = self.schedule.after(&reference).next() else {
                tracing::warn!("[UpdateService] Schedule has no upcoming firing, stopping");
                break;
            };
            let delay = (next_firing - Utc::now()).to_std().unwrap_or(Duration::ZERO);

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(delay) => {}
            }
            last_firing = next_firing;

            tracing::info!("[UpdateService] ⏰ Running scheduled TVS update...");
            let service = Arc::clone(&self);
            cycles.spawn(async move {
                service.run_cycle().await;
            });
        }

        cycles.close();
        cycles.wait().await;
        tracing::info!("[UpdateService] Stopped");

        Ok(())
    }

    /// One fetch-and-publish run. Failures are logged, never returned.
    pub async fn run_cycle(&self) -> PublishOutcome {
        let reading = self.fetcher.fetch().await;

        match &reading {
            Some(reading) => {
                self.metrics.record_fetch(reading.source, FetchOutcome::Success);
                self.metrics.record_total(reading.source, reading.total);
            }
            None => self
                .metrics
                .record_fetch(self.fetcher.source_name(), FetchOutcome::Failure),
        }

        let outcome = self.publisher.publish(reading.as_ref()).await;
        self.metrics.record_presence_update(outcome.as_str());

        outcome
    }
}
