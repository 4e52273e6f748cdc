use std::{cmp::Ordering, sync::LazyLock};

use regex::Regex;
use reqwest::{Client, header::USER_AGENT};
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tvs_types::{Category, CategoryBreakdown, MetricReading};
use url::Url;

use crate::{
    error::FetchError,
    sources::{amount_from_json, protocol_url},
    traits::MetricSource,
};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Location of the TVL time series inside the embedded page data.
const TVL_SERIES_POINTER: &str = "/props/pageProps/tvlChartData";

static NEXT_DATA_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script#__NEXT_DATA__").expect("Invalid __NEXT_DATA__ selector")
});

// Label, then up to 200 chars without a `$`, then the amount and its magnitude.
static TVS_AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)total\s+value\s+secured[^$]{0,200}\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*(billion|million|thousand|b|m|k)?\b",
    )
    .expect("Invalid TVS amount pattern")
});

/// Reads the figure from the rendered analytics page.
pub struct ScrapedPageSource {
    http_client: Client,
    page_url: Url,
}

impl ScrapedPageSource {
    pub const NAME: &'static str = "analytics-page";

    pub fn new(http_client: Client, page_base_url: &Url, slug: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http_client,
            page_url: protocol_url(page_base_url, slug)?,
        })
    }
}

#[async_trait::async_trait]
impl MetricSource for ScrapedPageSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self) -> Result<MetricReading, FetchError> {
        let html = self
            .http_client
            .get(self.page_url.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_reading(&html)
    }
}

/// Prefer the embedded page data, fall back to the visible label.
pub(crate) fn extract_reading(html: &str) -> Result<MetricReading, FetchError> {
    match extract_embedded_breakdown(html) {
        Ok(breakdown) => {
            return Ok(MetricReading::from_breakdown(
                breakdown,
                ScrapedPageSource::NAME,
            ));
        }
        Err(e) => {
            tracing::debug!("[ScrapedPageSource] No usable embedded data ({e}), scanning text");
        }
    }

    scan_labelled_amount(html)
        .map(|total| MetricReading::from_total(total, ScrapedPageSource::NAME))
        .ok_or_else(|| {
            FetchError::NotFound(
                "neither embedded page data nor a Total Value Secured label".to_string(),
            )
        })
}

fn extract_embedded_breakdown(html: &str) -> Result<CategoryBreakdown, FetchError> {
    let document = Html::parse_document(html);
    let script = document
        .select(&NEXT_DATA_SELECTOR)
        .next()
        .ok_or(FetchError::MissingField("__NEXT_DATA__"))?;

    let payload: Value = serde_json::from_str(&script.text().collect::<String>())?;
    let series = payload
        .pointer(TVL_SERIES_POINTER)
        .and_then(Value::as_array)
        .ok_or(FetchError::MissingField("tvlChartData"))?;
    let latest = latest_record(series).ok_or(FetchError::MissingField("tvlChartData"))?;

    let mut breakdown = CategoryBreakdown::default();
    for category in Category::iter() {
        if let Some(value) = latest.get(category.as_ref()) {
            breakdown.add(category, amount_from_json(value).unwrap_or(0.0));
        }
    }

    Ok(breakdown)
}

/// Record with the highest `date`, the last one wins ties (or when no record is dated).
fn latest_record(series: &[Value]) -> Option<&Map<String, Value>> {
    series
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            record_date(a)
                .partial_cmp(&record_date(b))
                .unwrap_or(Ordering::Equal)
                .then(ia.cmp(ib))
        })
        .map(|(_, record)| record)
}

fn record_date(record: &Map<String, Value>) -> Option<f64> {
    record.get("date").and_then(amount_from_json)
}

fn scan_labelled_amount(text: &str) -> Option<f64> {
    let captures = TVS_AMOUNT_PATTERN.captures(text)?;
    let amount = captures[1].replace(',', "").parse::<f64>().ok()?;
    let multiplier = captures
        .get(2)
        .map_or(1.0, |suffix| magnitude(suffix.as_str()));

    Some(amount * multiplier)
}

fn magnitude(suffix: &str) -> f64 {
    match suffix.to_ascii_lowercase().as_str() {
        "b" | "billion" => 1e9,
        "m" | "million" => 1e6,
        "k" | "thousand" => 1e3,
        _ => 1.0,
    }
}
