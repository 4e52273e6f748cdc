use std::sync::Arc;

use tvs_types::{MetricReading, format_usd};

use crate::traits::MetricSource;

/// Fetch boundary of a cycle: errors stop here and become `None`.
#[derive(Clone)]
pub struct MetricFetcher {
    source: Arc<dyn MetricSource>,
}

impl MetricFetcher {
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Read the current value once, without retrying.
    pub async fn fetch(&self) -> Option<MetricReading> {
        match self.source.fetch().await {
            Ok(reading) => {
                tracing::info!(
                    "[MetricFetcher] 📈 Fetched TVS from {}: {}",
                    reading.source,
                    format_usd(reading.total)
                );
                if let Some(breakdown) = &reading.breakdown {
                    tracing::info!("[MetricFetcher] Breakdown: {breakdown}");
                }
                Some(reading)
            }
            Err(e) => {
                tracing::error!(
                    "[MetricFetcher] 🔴 Error fetching TVS from {}: {}",
                    self.source.name(),
                    e
                );
                None
            }
        }
    }
}
