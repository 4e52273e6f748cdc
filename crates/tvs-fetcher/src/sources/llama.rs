use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tvs_types::{Category, CategoryBreakdown, MetricReading};
use url::Url;

use crate::{
    error::FetchError,
    sources::{amount_from_json, protocol_url},
    traits::MetricSource,
};

#[derive(Debug, Deserialize)]
struct ProtocolResponse {
    #[serde(default, rename = "currentChainTvls")]
    current_chain_tvls: Option<Value>,
}

/// Reads the per-chain values of the protocol analytics endpoint.
pub struct StructuredApiSource {
    http_client: Client,
    endpoint: Url,
}

impl StructuredApiSource {
    pub const NAME: &'static str = "analytics-api";

    pub fn new(http_client: Client, api_base_url: &Url, slug: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http_client,
            endpoint: protocol_url(api_base_url, slug)?,
        })
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl MetricSource for StructuredApiSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self) -> Result<MetricReading, FetchError> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        reading_from_body(&body)
    }
}

/// Parse a protocol response body into a reading.
pub(crate) fn reading_from_body(body: &[u8]) -> Result<MetricReading, FetchError> {
    let response: ProtocolResponse = serde_json::from_slice(body)?;

    let Some(Value::Object(chain_tvls)) = response.current_chain_tvls else {
        return Err(FetchError::MissingField("currentChainTvls"));
    };

    Ok(MetricReading::from_breakdown(
        summarize_chain_tvls(&chain_tvls),
        StructuredApiSource::NAME,
    ))
}

/// Accumulate every chain entry into its category.
pub(crate) fn summarize_chain_tvls(chain_tvls: &Map<String, Value>) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();

    for (key, value) in chain_tvls {
        let amount = amount_from_json(value).unwrap_or_else(|| {
            tracing::debug!("[StructuredApiSource] Ignoring unusable value for {key}: {value}");
            0.0
        });
        breakdown.add(Category::classify(key), amount);
    }

    breakdown
}
