use std::sync::Arc;

use tvs_types::MetricReading;

use crate::{error::FetchError, traits::MetricSource};

/// Tries `primary`, then `secondary` once if the primary failed.
pub struct FallbackSource {
    primary: Arc<dyn MetricSource>,
    secondary: Arc<dyn MetricSource>,
}

impl FallbackSource {
    pub const NAME: &'static str = "fallback";

    pub fn new(primary: Arc<dyn MetricSource>, secondary: Arc<dyn MetricSource>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait::async_trait]
impl MetricSource for FallbackSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self) -> Result<MetricReading, FetchError> {
        let primary_error = match self.primary.fetch().await {
            Ok(reading) => return Ok(reading),
            Err(e) => e,
        };

        tracing::warn!(
            "[FallbackSource] ⚠️ {} failed ({}), trying {}",
            self.primary.name(),
            primary_error,
            self.secondary.name()
        );

        self.secondary
            .fetch()
            .await
            .map_err(|secondary_error| FetchError::Exhausted {
                primary: Box::new(primary_error),
                secondary: Box::new(secondary_error),
            })
    }
}
