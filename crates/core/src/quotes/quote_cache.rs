//! In-memory quote cache using moka

use chrono::{DateTime, Utc};
use moka::future::Cache;
use nexus_market_data::StockQuote;
use std::time::Duration;

use crate::constants::{QUOTE_CACHE_CAPACITY, QUOTE_FRESHNESS_WINDOW};

/// A quote plus the instant it entered the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuote {
    pub quote: StockQuote,
    pub cached_at: DateTime<Utc>,
}

impl CachedQuote {
    /// Fresh while strictly less than `window` has elapsed.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        now.signed_duration_since(self.cached_at) < window
    }
}

/// Symbol-keyed quote cache. Last write wins.
///
/// Moka's TTL only bounds memory; freshness is decided against the caller's
/// clock so it can be tested without sleeping.
pub struct QuoteCache {
    entries: Cache<String, CachedQuote>,
    freshness_window: chrono::Duration,
}

impl QuoteCache {
    pub fn new(freshness_window: Duration) -> Self {
        Self::with_capacity(freshness_window, QUOTE_CACHE_CAPACITY)
    }

    pub fn with_capacity(freshness_window: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(freshness_window)
                .max_capacity(capacity)
                .build(),
            freshness_window: chrono::Duration::from_std(freshness_window)
                .unwrap_or_else(|_| chrono::Duration::seconds(60)),
        }
    }

    /// Raw entry, fresh or not.
    pub async fn get(&self, symbol: &str) -> Option<CachedQuote> {
        self.entries.get(symbol).await
    }

    /// Cached quote for `symbol` if it is still fresh at `now`.
    pub async fn get_fresh(&self, symbol: &str, now: DateTime<Utc>) -> Option<StockQuote> {
        self.entries
            .get(symbol)
            .await
            .filter(|entry| entry.is_fresh_at(now, self.freshness_window))
            .map(|entry| entry.quote)
    }

    pub async fn insert(&self, symbol: &str, quote: StockQuote, now: DateTime<Utc>) {
        self.entries
            .insert(
                symbol.to_string(),
                CachedQuote {
                    quote,
                    cached_at: now,
                },
            )
            .await;
    }

    pub async fn invalidate(&self, symbol: &str) {
        self.entries.invalidate(symbol).await;
    }

    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(QUOTE_FRESHNESS_WINDOW)
    }
}
