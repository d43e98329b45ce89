//! Finnhub quote provider.
//!
//! This module provides market data from the Finnhub API:
//! - Latest quotes via the /quote endpoint
//! - Symbol search via the /search endpoint
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{StockQuote, SymbolMatch};
use crate::provider::QuoteProvider;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    description: String,
    display_symbol: String,
    symbol: String,
    #[serde(rename = "type")]
    security_type: String,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, Duration::from_secs(15))
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            warn!("Falling back to a default HTTP client without timeout: {}", e);
            Client::new()
        });

        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, MarketDataError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);
        let mut url =
            Url::parse(&raw).map_err(|e| MarketDataError::InvalidUrl(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("token", &self.api_key);
        Ok(url)
    }

    /// Make a GET request to the Finnhub API and return the raw body.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = self.endpoint_url(endpoint, params)?;

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(MarketDataError::from_transport)?;

        let status = response.status();

        // Finnhub answers 403 once the key's quota is used up
        if status == StatusCode::FORBIDDEN {
            return Err(MarketDataError::RateLimitExceeded);
        }

        if status != StatusCode::OK {
            return Err(MarketDataError::from_status(status.as_u16()));
        }

        response.text().await.map_err(MarketDataError::from_transport)
    }
}

fn to_decimal(value: Option<f64>) -> Decimal {
    value
        .and_then(|v| Decimal::try_from(v).ok())
        .unwrap_or(Decimal::ZERO)
}

fn parse_quote(body: &str, symbol: &str) -> Result<StockQuote, MarketDataError> {
    let response: QuoteResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::DecodingFailed(e.to_string()))?;

    // Finnhub returns zeros for unknown symbols instead of an error
    let price = response.c.unwrap_or(0.0);
    if price == 0.0 && response.pc.unwrap_or(0.0) == 0.0 {
        return Err(MarketDataError::InvalidSymbol(symbol.to_string()));
    }

    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(StockQuote {
        symbol: symbol.to_string(),
        price: to_decimal(response.c),
        change: to_decimal(response.d),
        change_percent: to_decimal(response.dp),
        open: to_decimal(response.o),
        high: to_decimal(response.h),
        low: to_decimal(response.l),
        previous_close: to_decimal(response.pc),
        volume: 0, // /quote doesn't provide volume
        market_cap: None,
        pe_ratio: None,
        dividend_yield: None,
        timestamp,
        source: PROVIDER_ID.to_string(),
    })
}

fn parse_search(body: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::DecodingFailed(e.to_string()))?;

    Ok(response
        .result
        .into_iter()
        .map(|item| SymbolMatch {
            security_type: map_security_type(&item.security_type),
            symbol: item.symbol,
            display_symbol: item.display_symbol,
            description: item.description,
        })
        .collect())
}

/// Map Finnhub security type to a display label.
fn map_security_type(finnhub_type: &str) -> String {
    match finnhub_type.to_lowercase().as_str() {
        "common stock" | "stock" => "Stock".to_string(),
        "etf" | "etp" => "ETF".to_string(),
        "mutual fund" | "fund" => "Mutual Fund".to_string(),
        "adr" => "ADR".to_string(),
        "reit" => "REIT".to_string(),
        _ => finnhub_type.to_string(),
    }
}

// ============================================================================
// QuoteProvider Implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        debug!("Fetching latest quote for {} from Finnhub", symbol);
        let body = self.fetch("/quote", &[("symbol", symbol)]).await?;
        parse_quote(&body, symbol)
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        debug!("Searching Finnhub for '{}'", query);
        let body = self.fetch("/search", &[("q", query)]).await?;
        let matches = parse_search(&body)?;
        debug!("Finnhub: found {} search results for '{}'", matches.len(), query);
        Ok(matches)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_id() {
        let provider = FinnhubProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "FINNHUB");
    }

    #[test]
    fn test_endpoint_url_carries_token() {
        let provider = FinnhubProvider::new("secret".to_string());
        let url = provider.endpoint_url("/quote", &[("symbol", "AAPL")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://finnhub.io/api/v1/quote?symbol=AAPL&token=secret"
        );
    }

    #[test]
    fn test_quote_response_parsing() {
        let json = r#"{
            "c": 150.25,
            "d": 1.50,
            "dp": 1.01,
            "h": 152.00,
            "l": 148.50,
            "o": 149.00,
            "pc": 148.75,
            "t": 1704067200
        }"#;

        let quote = parse_quote(json, "AAPL").unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(150.25));
        assert_eq!(quote.change, dec!(1.5));
        assert_eq!(quote.change_percent, dec!(1.01));
        assert_eq!(quote.previous_close, dec!(148.75));
        assert_eq!(quote.timestamp.timestamp(), 1704067200);
        assert_eq!(quote.source, "FINNHUB");
    }

    #[test]
    fn test_unknown_symbol_is_invalid() {
        let json = r#"{"c": 0, "d": null, "dp": null, "h": 0, "l": 0, "o": 0, "pc": 0, "t": 0}"#;
        let err = parse_quote(json, "NOPE").unwrap_err();
        assert_eq!(err, MarketDataError::InvalidSymbol("NOPE".to_string()));
    }

    #[test]
    fn test_quote_decoding_failure() {
        let err = parse_quote("{\"c\": \"abc\"}", "AAPL").unwrap_err();
        assert!(matches!(err, MarketDataError::DecodingFailed(_)));
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "count": 2,
            "result": [
                {
                    "description": "Apple Inc",
                    "displaySymbol": "AAPL",
                    "symbol": "AAPL",
                    "type": "Common Stock"
                },
                {
                    "description": "Apple Hospitality REIT Inc",
                    "displaySymbol": "APLE",
                    "symbol": "APLE",
                    "type": "REIT"
                }
            ]
        }"#;

        let matches = parse_search(json).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[0].security_type, "Stock");
        assert_eq!(matches[1].security_type, "REIT");
    }

    #[test]
    fn test_map_security_type() {
        assert_eq!(map_security_type("Common Stock"), "Stock");
        assert_eq!(map_security_type("ETP"), "ETF");
        assert_eq!(map_security_type("Unknown Type"), "Unknown Type");
    }

    // Request-level error mapping against a local server

    use crate::provider::test_support::{canned_server, refused_url};

    async fn quote_from(base_url: String, timeout: Duration) -> Result<StockQuote, MarketDataError> {
        FinnhubProvider::with_base_url("key".to_string(), base_url, timeout)
            .get_quote("AAPL")
            .await
    }

    #[tokio::test]
    async fn test_get_quote_success() {
        let url = canned_server(
            200,
            r#"{"c":190.5,"d":1.5,"dp":0.79,"h":191,"l":188,"o":189,"pc":189,"t":1714521600}"#,
            Duration::ZERO,
        )
        .await;
        let quote = quote_from(url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(quote.price, dec!(190.5));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_unavailable() {
        let err = quote_from(refused_url().await, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::NetworkUnavailable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_quota_statuses_are_rate_limit() {
        for status in [403, 429] {
            let url = canned_server(status, "", Duration::ZERO).await;
            let err = quote_from(url, Duration::from_secs(5)).await.unwrap_err();
            assert_eq!(err, MarketDataError::RateLimitExceeded, "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let url = canned_server(500, "", Duration::ZERO).await;
        let err = quote_from(url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, MarketDataError::ServerError(500));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let url = canned_server(200, "{}", Duration::from_secs(3)).await;
        let err = quote_from(url, Duration::from_millis(200)).await.unwrap_err();
        assert_eq!(err, MarketDataError::Timeout);
    }

    #[tokio::test]
    async fn test_search_maps_errors_too() {
        let url = canned_server(429, "", Duration::ZERO).await;
        let err = FinnhubProvider::with_base_url("key".to_string(), url, Duration::from_secs(5))
            .search("apple")
            .await
            .unwrap_err();
        assert_eq!(err, MarketDataError::RateLimitExceeded);
    }
}
