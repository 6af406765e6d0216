//! BCV dollar-rate HTTP client.
//!
//! [`RateClient`] issues a single GET against the pydolarve API and parses
//! the bolívar-per-USD rate out of the response. It never retries; callers
//! that want the fire-and-forget behavior of the intake form treat any
//! error as "rate unavailable" and move on.

use std::time::Duration;

use rust_decimal::Decimal;

/// Public BCV endpoint queried when no override is configured.
pub const DEFAULT_RATE_URL: &str = "https://pydolarve.org/api/v1/dollar?page=bcv";

/// HTTP request timeout for the single fetch attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for rate-fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The rate API returned a non-2xx status code.
    #[error("Rate API returned HTTP {0}")]
    HttpStatus(u16),

    /// Neither `monitors.usd.price` nor `price` was present.
    #[error("Rate missing from response payload")]
    MissingRate,

    /// The price field existed but did not hold a positive decimal.
    #[error("Unusable rate value '{0}'")]
    BadRate(String),
}

// ---------------------------------------------------------------------------
// RateClient
// ---------------------------------------------------------------------------

/// Fetches the USD exchange rate from the configured endpoint.
pub struct RateClient {
    client: reqwest::Client,
    url: String,
}

impl RateClient {
    /// Create a client against a specific rate endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    /// Client against the public BCV endpoint.
    pub fn bcv() -> Self {
        Self::new(DEFAULT_RATE_URL)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current bolívar-per-USD rate. One attempt, no retry.
    pub async fn fetch_usd(&self) -> Result<Decimal, RateError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(RateError::HttpStatus(response.status().as_u16()));
        }
        let body: serde_json::Value = response.json().await?;
        parse_rate_payload(&body)
    }
}

impl Default for RateClient {
    fn default() -> Self {
        Self::bcv()
    }
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

/// Extract the USD rate from a rate-API response body.
///
/// The expected shape is `{ "monitors": { "usd": { "price": … } } }` with a
/// bare `{ "price": … }` fallback. The price may arrive as a JSON number or
/// a numeric string; anything non-positive or non-numeric is rejected.
pub fn parse_rate_payload(body: &serde_json::Value) -> Result<Decimal, RateError> {
    let price = body
        .pointer("/monitors/usd/price")
        .filter(|v| !v.is_null())
        .or_else(|| body.get("price").filter(|v| !v.is_null()))
        .ok_or(RateError::MissingRate)?;

    let rate = match price {
        serde_json::Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| RateError::BadRate(s.clone()))?,
        serde_json::Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| RateError::BadRate(n.to_string()))?,
        other => return Err(RateError::BadRate(other.to_string())),
    };

    if rate <= Decimal::ZERO {
        return Err(RateError::BadRate(rate.to_string()));
    }
    Ok(rate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    // -- parsing --

    #[test]
    fn parses_nested_monitor_price_string() {
        let body = json!({ "monitors": { "usd": { "price": "36.58" } } });
        assert_eq!(parse_rate_payload(&body).unwrap(), dec!(36.58));
    }

    #[test]
    fn parses_top_level_price_fallback() {
        let body = json!({ "price": "40.25" });
        assert_eq!(parse_rate_payload(&body).unwrap(), dec!(40.25));
    }

    #[test]
    fn nested_price_wins_over_top_level() {
        let body = json!({
            "monitors": { "usd": { "price": "36.58" } },
            "price": "99"
        });
        assert_eq!(parse_rate_payload(&body).unwrap(), dec!(36.58));
    }

    #[test]
    fn accepts_numeric_price() {
        let body = json!({ "monitors": { "usd": { "price": 37.1 } } });
        assert_eq!(parse_rate_payload(&body).unwrap(), dec!(37.1));
    }

    #[test]
    fn missing_price_is_an_error() {
        assert_matches!(
            parse_rate_payload(&json!({ "monitors": { "usd": {} } })),
            Err(RateError::MissingRate)
        );
        assert_matches!(parse_rate_payload(&json!({})), Err(RateError::MissingRate));
    }

    #[test]
    fn non_numeric_price_is_an_error() {
        let body = json!({ "price": "no disponible" });
        assert_matches!(parse_rate_payload(&body), Err(RateError::BadRate(_)));
    }

    #[test]
    fn zero_and_negative_rates_are_rejected() {
        assert_matches!(
            parse_rate_payload(&json!({ "price": 0 })),
            Err(RateError::BadRate(_))
        );
        assert_matches!(
            parse_rate_payload(&json!({ "price": "-3" })),
            Err(RateError::BadRate(_))
        );
    }

    #[test]
    fn null_nested_price_falls_through_to_top_level() {
        let body = json!({
            "monitors": { "usd": { "price": null } },
            "price": "38.2"
        });
        assert_eq!(parse_rate_payload(&body).unwrap(), dec!(38.2));
    }

    #[test]
    fn null_everywhere_is_missing() {
        let body = json!({ "monitors": { "usd": { "price": null } }, "price": null });
        assert_matches!(parse_rate_payload(&body), Err(RateError::MissingRate));
    }

    // -- client construction --

    #[test]
    fn new_does_not_panic() {
        let client = RateClient::new("http://127.0.0.1:9/rate");
        assert_eq!(client.url(), "http://127.0.0.1:9/rate");
    }

    #[test]
    fn default_targets_the_bcv_endpoint() {
        assert_eq!(RateClient::default().url(), DEFAULT_RATE_URL);
    }

    // -- error display --

    #[test]
    fn error_display_http_status() {
        let err = RateError::HttpStatus(503);
        assert_eq!(err.to_string(), "Rate API returned HTTP 503");
    }

    #[test]
    fn error_display_missing_rate() {
        assert_eq!(
            RateError::MissingRate.to_string(),
            "Rate missing from response payload"
        );
    }
}
