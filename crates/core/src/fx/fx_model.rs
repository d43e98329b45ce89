use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use nexus_market_data::{CurrencyCode, RateSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a rate table came from, surfaced so the UI can badge it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    /// Fetched from the rate source during this request
    Live,
    /// Read back from the persisted rate cache
    Cached,
    /// Static approximate table
    Fallback,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Live => "LIVE",
            RateSource::Cached => "CACHED",
            RateSource::Fallback => "FALLBACK",
        }
    }
}

/// Rates of every recognized currency against one base currency.
///
/// The base rate is implicit: it is never stored and always reads as 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    pub base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
    pub fetched_at: DateTime<Utc>,
    pub source: RateSource,
}

impl ExchangeRateTable {
    /// Fetch time used by fallback tables: older than anything real.
    pub const FALLBACK_TIMESTAMP: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

    /// Builds a table, dropping the base entry and any non-positive rate.
    pub fn new(
        base: CurrencyCode,
        rates: impl IntoIterator<Item = (CurrencyCode, Decimal)>,
        fetched_at: DateTime<Utc>,
        source: RateSource,
    ) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(code, rate)| *code != base && *rate > Decimal::ZERO)
            .collect();

        Self {
            base,
            rates,
            fetched_at,
            source,
        }
    }

    pub fn from_snapshot(snapshot: RateSnapshot, fetched_at: DateTime<Utc>) -> Self {
        Self::new(snapshot.base, snapshot.rates, fetched_at, RateSource::Live)
    }

    pub fn with_source(mut self, source: RateSource) -> Self {
        self.source = source;
        self
    }

    /// Rate of `code` against the base; 1 for the base itself.
    pub fn rate_for(&self, code: CurrencyCode) -> Option<Decimal> {
        if code == self.base {
            return Some(Decimal::ONE);
        }
        self.rates.get(&code).copied()
    }

    /// Explicit (non-base) entries.
    pub fn rates(&self) -> &BTreeMap<CurrencyCode, Decimal> {
        &self.rates
    }

    /// Base first, then every currency with a stored rate.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        std::iter::once(self.base)
            .chain(self.rates.keys().copied())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Stale once strictly more than `window` has elapsed since the fetch.
    /// Fallback tables are never stale.
    pub fn is_stale_at(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        if self.source == RateSource::Fallback {
            return false;
        }
        now.signed_duration_since(self.fetched_at) > window
    }
}
