use tvs_types::MetricReading;

use crate::error::FetchError;

/// Anything able to produce the current Total Value Secured.
#[async_trait::async_trait]
pub trait MetricSource: Send + Sync {
    /// Short identifier used in logs and metrics
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<MetricReading, FetchError>;
}
