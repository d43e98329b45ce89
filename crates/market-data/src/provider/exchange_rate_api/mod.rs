//! ExchangeRate-API rate source.
//!
//! `GET {base_url}/latest/{BASE}` returns
//! `{ "base": "USD", "date": "2024-01-01", "rates": { "EUR": 0.92, ... } }`.
//! The free endpoint needs no key and refreshes roughly once a day.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, RateSnapshot};
use crate::provider::ExchangeRateProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const PROVIDER_ID: &str = "EXCHANGE_RATE_API";

/// Response from /latest/{BASE}
#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    rates: HashMap<String, f64>,
}

pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a provider against a custom endpoint (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            warn!("Falling back to a default HTTP client without timeout: {}", e);
            Client::new()
        });

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn latest_url(&self, base: CurrencyCode) -> Result<Url, MarketDataError> {
        let raw = format!("{}/latest/{}", self.base_url.trim_end_matches('/'), base);
        Url::parse(&raw).map_err(|e| MarketDataError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a /latest body, keeping only recognized currencies.
fn parse_latest(body: &str, base: CurrencyCode) -> Result<RateSnapshot, MarketDataError> {
    let response: LatestResponse = serde_json::from_str(body)
        .map_err(|e| MarketDataError::DecodingFailed(e.to_string()))?;

    let reported_base: CurrencyCode = response.base.parse()?;
    if reported_base != base {
        return Err(MarketDataError::DecodingFailed(format!(
            "Requested base {} but received {}",
            base, reported_base
        )));
    }

    let mut rates = BTreeMap::new();
    for (code, value) in response.rates {
        let Ok(currency) = code.parse::<CurrencyCode>() else {
            continue;
        };
        if currency == base {
            continue;
        }
        match Decimal::try_from(value) {
            Ok(rate) if rate > Decimal::ZERO => {
                rates.insert(currency, rate);
            }
            _ => warn!("Ignoring invalid rate {} for {}", value, currency),
        }
    }

    Ok(RateSnapshot {
        base,
        rates,
        fetched_at: Utc::now(),
    })
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, MarketDataError> {
        let url = self.latest_url(base)?;
        debug!("Fetching rates for {} from {}", base, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(MarketDataError::from_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MarketDataError::from_status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(MarketDataError::from_transport)?;

        let snapshot = parse_latest(&body, base)?;
        debug!("Received {} rates for base {}", snapshot.rates.len(), base);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_filters_unknown_currencies() {
        let body = r#"{
            "base": "GEL",
            "date": "2024-05-01",
            "time_last_updated": 1714521601,
            "rates": { "GEL": 1, "USD": 0.36, "EUR": 0.33, "XAU": 0.0002, "BTN": 30.1 }
        }"#;

        let snapshot = parse_latest(body, CurrencyCode::Gel).unwrap();
        assert_eq!(snapshot.base, CurrencyCode::Gel);
        assert_eq!(snapshot.rates.len(), 2);
        assert_eq!(snapshot.rates[&CurrencyCode::Usd], dec!(0.36));
        assert_eq!(snapshot.rates[&CurrencyCode::Eur], dec!(0.33));
        assert!(!snapshot.rates.contains_key(&CurrencyCode::Gel));
    }

    #[test]
    fn test_parse_drops_non_positive_rates() {
        let body = r#"{"base": "USD", "rates": { "EUR": 0.0, "GBP": -1.0, "JPY": 150.5 }}"#;
        let snapshot = parse_latest(body, CurrencyCode::Usd).unwrap();
        assert_eq!(snapshot.rates.len(), 1);
        assert_eq!(snapshot.rates[&CurrencyCode::Jpy], dec!(150.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_latest("<html>oops</html>", CurrencyCode::Usd).unwrap_err();
        assert!(matches!(err, MarketDataError::DecodingFailed(_)));
    }

    #[test]
    fn test_parse_rejects_base_mismatch() {
        let body = r#"{"base": "EUR", "rates": { "USD": 1.08 }}"#;
        let err = parse_latest(body, CurrencyCode::Usd).unwrap_err();
        assert!(matches!(err, MarketDataError::DecodingFailed(_)));
    }

    #[test]
    fn test_latest_url() {
        let provider =
            ExchangeRateApiProvider::with_base_url("https://rates.example.com/v4/", DEFAULT_TIMEOUT);
        let url = provider.latest_url(CurrencyCode::Gel).unwrap();
        assert_eq!(url.as_str(), "https://rates.example.com/v4/latest/GEL");
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let provider = ExchangeRateApiProvider::with_base_url("not a url", DEFAULT_TIMEOUT);
        let err = provider.fetch_rates(CurrencyCode::Usd).await.unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidUrl(_)));
    }

    // Request-level error mapping against a local server

    use crate::provider::test_support::{canned_server, refused_url};

    async fn fetch_from(base_url: String, timeout: Duration) -> Result<RateSnapshot, MarketDataError> {
        ExchangeRateApiProvider::with_base_url(base_url, timeout)
            .fetch_rates(CurrencyCode::Usd)
            .await
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = canned_server(
            200,
            r#"{"base":"USD","rates":{"EUR":0.92,"GEL":2.7}}"#,
            Duration::ZERO,
        )
        .await;
        let snapshot = fetch_from(url, DEFAULT_TIMEOUT).await.unwrap();
        assert_eq!(snapshot.rates[&CurrencyCode::Eur], dec!(0.92));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_unavailable() {
        let err = fetch_from(refused_url().await, DEFAULT_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, MarketDataError::NetworkUnavailable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let url = canned_server(500, "", Duration::ZERO).await;
        let err = fetch_from(url, DEFAULT_TIMEOUT).await.unwrap_err();
        assert_eq!(err, MarketDataError::ServerError(500));
    }

    #[tokio::test]
    async fn test_too_many_requests_is_rate_limit() {
        let url = canned_server(429, "", Duration::ZERO).await;
        let err = fetch_from(url, DEFAULT_TIMEOUT).await.unwrap_err();
        assert_eq!(err, MarketDataError::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let url = canned_server(200, "{}", Duration::from_secs(3)).await;
        let err = fetch_from(url, Duration::from_millis(200)).await.unwrap_err();
        assert_eq!(err, MarketDataError::Timeout);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decoding_failure() {
        let url = canned_server(200, "not json", Duration::ZERO).await;
        let err = fetch_from(url, DEFAULT_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, MarketDataError::DecodingFailed(_)));
    }
}
