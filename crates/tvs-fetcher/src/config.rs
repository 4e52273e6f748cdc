use std::{sync::Arc, time::Duration};

use strum::{Display, EnumString};
use url::Url;

use crate::{
    error::FetchError,
    sources::{FallbackSource, ScrapedPageSource, StructuredApiSource, http_client},
    traits::MetricSource,
};

/// Which upstream the bot reads the figure from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SourceKind {
    #[default]
    Api,
    Page,
    ApiWithPageFallback,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub api_base_url: Url,
    pub page_base_url: Url,
    pub protocol_slug: String,
    pub request_timeout: Duration,
}

impl SourceConfig {
    pub fn build(&self) -> Result<Arc<dyn MetricSource>, FetchError> {
        let client = http_client(self.request_timeout)?;

        let source: Arc<dyn MetricSource> = match self.kind {
            SourceKind::Api => Arc::new(StructuredApiSource::new(
                client,
                &self.api_base_url,
                &self.protocol_slug,
            )?),
            SourceKind::Page => Arc::new(ScrapedPageSource::new(
                client,
                &self.page_base_url,
                &self.protocol_slug,
            )?),
            SourceKind::ApiWithPageFallback => Arc::new(FallbackSource::new(
                Arc::new(StructuredApiSource::new(
                    client.clone(),
                    &self.api_base_url,
                    &self.protocol_slug,
                )?),
                Arc::new(ScrapedPageSource::new(
                    client,
                    &self.page_base_url,
                    &self.protocol_slug,
                )?),
            )),
        };

        Ok(source)
    }
}
