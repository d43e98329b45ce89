//! Tests for QuoteService caching and fan-out.

use super::*;
use crate::errors::Error;
use crate::utils::ManualClock;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use nexus_market_data::{MarketDataError, QuoteProvider};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

// =========================================================================
// Mock provider
// =========================================================================

/// Returns a quote whose price is the call number, so refetches are visible.
#[derive(Clone, Default)]
struct CountingProvider {
    calls: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl CountingProvider {
    fn fail_for(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    fn calls_for(&self, symbol: &str) -> usize {
        self.calls.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl QuoteProvider for CountingProvider {
    fn id(&self) -> &'static str {
        "COUNTING"
    }

    async fn get_quote(&self, symbol: &str) -> std::result::Result<StockQuote, MarketDataError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(symbol.to_string()).or_insert(0);
            *n += 1;
            *n
        };

        if self.failing.lock().unwrap().contains(symbol) {
            return Err(MarketDataError::ServerError(503));
        }

        Ok(quote(symbol, Decimal::from(n as u64)))
    }

    async fn search(&self, query: &str) -> std::result::Result<Vec<SymbolMatch>, MarketDataError> {
        Ok(vec![SymbolMatch {
            symbol: query.to_uppercase(),
            display_symbol: query.to_uppercase(),
            description: "Test Corp".to_string(),
            security_type: "Stock".to_string(),
        }])
    }
}

fn quote(symbol: &str, price: Decimal) -> StockQuote {
    StockQuote {
        symbol: symbol.to_string(),
        price,
        change: dec!(0),
        change_percent: dec!(0),
        open: price,
        high: price,
        low: price,
        previous_close: price,
        volume: 1_000,
        market_cap: None,
        pe_ratio: None,
        dividend_yield: None,
        timestamp: noon(),
        source: "COUNTING".to_string(),
    }
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn service(provider: &CountingProvider, clock: &ManualClock) -> QuoteService {
    QuoteService::new(Arc::new(provider.clone())).with_clock(Arc::new(clock.clone()))
}

// =========================================================================
// get_quote
// =========================================================================

#[tokio::test]
async fn test_second_call_within_window_hits_cache() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    let first = quotes.get_quote("AAPL").await.unwrap();
    clock.advance(Duration::seconds(30));
    let second = quotes.get_quote("AAPL").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls_for("AAPL"), 1);
}

#[tokio::test]
async fn test_call_after_window_refetches() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    let first = quotes.get_quote("AAPL").await.unwrap();
    clock.advance(Duration::seconds(61));
    let second = quotes.get_quote("AAPL").await.unwrap();

    assert_eq!(first.price, dec!(1));
    assert_eq!(second.price, dec!(2));
    assert_eq!(provider.calls_for("AAPL"), 2);
}

#[tokio::test]
async fn test_symbol_is_normalized_before_caching() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    quotes.get_quote("  aapl ").await.unwrap();
    let quote = quotes.get_quote("AAPL").await.unwrap();

    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(provider.total_calls(), 1);
}

#[tokio::test]
async fn test_invalid_symbol_rejected_without_fetch() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    for bad in ["", "   ", "BRK B", "AA\tPL"] {
        let err = quotes.get_quote(bad).await.unwrap_err();
        assert!(
            matches!(err, Error::MarketData(MarketDataError::InvalidSymbol(_))),
            "unexpected error for {:?}: {:?}",
            bad,
            err
        );
    }
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn test_provider_error_is_not_cached() {
    let provider = CountingProvider::default();
    provider.fail_for("TSLA");
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    assert!(quotes.get_quote("TSLA").await.is_err());
    assert!(quotes.get_quote("TSLA").await.is_err());
    assert_eq!(provider.calls_for("TSLA"), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    quotes.get_quote("MSFT").await.unwrap();
    quotes.invalidate("msft").await;
    quotes.get_quote("MSFT").await.unwrap();
    assert_eq!(provider.calls_for("MSFT"), 2);

    quotes.clear().await;
    quotes.get_quote("MSFT").await.unwrap();
    assert_eq!(provider.calls_for("MSFT"), 3);
}

// =========================================================================
// get_quotes
// =========================================================================

#[tokio::test]
async fn test_get_quotes_dedupes_and_drops_failures() {
    let provider = CountingProvider::default();
    provider.fail_for("TSLA");
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    let symbols: Vec<String> = ["AAPL", "tsla", "MSFT", "aapl", "", "NVDA"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let result = quotes.get_quotes(&symbols).await;

    let returned: Vec<&str> = result.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(returned, vec!["AAPL", "MSFT", "NVDA"]);
    assert_eq!(provider.calls_for("AAPL"), 1);
    assert_eq!(provider.calls_for("TSLA"), 1);
}

#[tokio::test]
async fn test_get_quotes_empty_input() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());

    assert!(service(&provider, &clock).get_quotes(&[]).await.is_empty());
    assert_eq!(provider.total_calls(), 0);
}

// =========================================================================
// search
// =========================================================================

#[tokio::test]
async fn test_search_delegates_and_skips_blank_queries() {
    let provider = CountingProvider::default();
    let clock = ManualClock::new(noon());
    let quotes = service(&provider, &clock);

    assert!(quotes.search("  ").await.unwrap().is_empty());

    let matches = quotes.search(" app ").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].symbol, "APP");
}

#[test]
fn test_normalize_symbol() {
    assert_eq!(normalize_symbol(" brk.b ").unwrap(), "BRK.B");
    assert!(normalize_symbol("\u{7}AAPL").is_err());
}

#[tokio::test]
async fn test_from_config_without_key_uses_simulated_quotes() {
    let config = crate::config::NexusConfig::default();
    let quotes = QuoteService::from_config(&config);
    assert_eq!(quotes.provider_id(), "SIMULATED");

    let quote = quotes.get_quote("aapl").await.unwrap();
    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.source, "SIMULATED");
}
