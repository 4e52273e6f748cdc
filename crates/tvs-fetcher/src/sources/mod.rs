mod fallback;
mod llama;
mod page;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

pub use fallback::FallbackSource;
pub use llama::StructuredApiSource;
pub use page::ScrapedPageSource;

use crate::error::FetchError;

pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder().timeout(timeout).build().map_err(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        FetchError::HttpError(e)
    })
}

/// `{base}/protocol/{slug}`, whether or not `base` has a trailing slash.
pub(crate) fn protocol_url(base: &Url, slug: &str) -> Result<Url, FetchError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("protocol/{slug}"))?)
}

/// Read a JSON value as a USD amount.
///
/// Numbers and numeric strings are accepted. Anything else, as well as
/// negative or non-finite values, yields `None` and is meant to count as zero.
pub(crate) fn amount_from_json(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_protocol_url() {
        let base = Url::parse("https://api.llama.fi").unwrap();
        assert_eq!(
            protocol_url(&base, "redstone").unwrap().as_str(),
            "https://api.llama.fi/protocol/redstone"
        );

        let nested = Url::parse("https://example.com/v2").unwrap();
        assert_eq!(
            protocol_url(&nested, "redstone").unwrap().as_str(),
            "https://example.com/v2/protocol/redstone"
        );
    }

    #[test]
    fn test_amount_from_json() {
        assert_eq!(amount_from_json(&json!(12.5)), Some(12.5));
        assert_eq!(amount_from_json(&json!(" 40 ")), Some(40.0));
        assert_eq!(amount_from_json(&json!("n/a")), None);
        assert_eq!(amount_from_json(&json!(null)), None);
        assert_eq!(amount_from_json(&json!({"usd": 1})), None);
        assert_eq!(amount_from_json(&json!(-3.0)), None);
        assert_eq!(amount_from_json(&json!("NaN")), None);
    }
}
