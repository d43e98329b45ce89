//! Simulated quote provider used when no API key is configured.
//!
//! Quotes are generated from an RNG seeded with the symbol and the current
//! minute: repeated requests within a minute agree, prices drift between
//! minutes, and every symbol keeps a stable price level.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use num_traits::FromPrimitive;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{StockQuote, SymbolMatch};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "SIMULATED";

/// Daily volatility of the simulated price around its anchor.
const VOLATILITY: f64 = 0.02;

/// Symbols offered by [`SimulatedQuoteProvider::search`].
const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc"),
    ("MSFT", "Microsoft Corp"),
    ("GOOGL", "Alphabet Inc"),
    ("AMZN", "Amazon.com Inc"),
    ("NVDA", "NVIDIA Corp"),
    ("TSLA", "Tesla Inc"),
    ("META", "Meta Platforms Inc"),
    ("VOO", "Vanguard S&P 500 ETF"),
];

#[derive(Debug, Default, Clone)]
pub struct SimulatedQuoteProvider;

impl SimulatedQuoteProvider {
    pub fn new() -> Self {
        Self
    }

    fn symbol_hash(symbol: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        hasher.finish()
    }

    /// Generate the quote for `symbol` as of `now`.
    pub fn quote_at(&self, symbol: &str, now: DateTime<Utc>) -> Result<StockQuote, MarketDataError> {
        let symbol_hash = Self::symbol_hash(symbol);
        let minute = now.timestamp().div_euclid(60) as u64;
        let mut rng = StdRng::seed_from_u64(symbol_hash ^ minute.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let log_normal = LogNormal::new(0.0, VOLATILITY)
            .map_err(|e| MarketDataError::DecodingFailed(e.to_string()))?;

        // Stable per-symbol price level between 20 and 500
        let anchor = 20.0 + (symbol_hash % 48_000) as f64 / 100.0;
        let previous_close = anchor;
        let price = anchor * log_normal.sample(&mut rng);
        let open = previous_close * (1.0 + rng.gen_range(-0.005..0.005));
        let high = open.max(price) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(price) * (1.0 - rng.gen_range(0.0..0.01));
        let change = price - previous_close;
        let change_percent = change / previous_close * 100.0;

        let shares_outstanding = 1e8 + (symbol_hash % 10_000) as f64 * 1e6;
        let volume = rng.gen_range(100_000..5_000_000);

        Ok(StockQuote {
            symbol: symbol.to_string(),
            price: money(price),
            change: money(change),
            change_percent: money(change_percent),
            open: money(open),
            high: money(high),
            low: money(low),
            previous_close: money(previous_close),
            volume,
            market_cap: Decimal::from_f64(price * shares_outstanding).map(|d| d.round()),
            pe_ratio: Some(money(rng.gen_range(8.0..40.0))),
            dividend_yield: Some(money(rng.gen_range(0.0..4.0))),
            timestamp: now,
            source: PROVIDER_ID.to_string(),
        })
    }
}

fn money(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

#[async_trait]
impl QuoteProvider for SimulatedQuoteProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        self.quote_at(symbol, Utc::now())
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(KNOWN_SYMBOLS
            .iter()
            .filter(|(symbol, name)| {
                symbol.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
            })
            .map(|(symbol, name)| SymbolMatch {
                symbol: symbol.to_string(),
                display_symbol: symbol.to_string(),
                description: name.to_string(),
                security_type: if symbol.starts_with("VO") { "ETF" } else { "Stock" }.to_string(),
            })
            .collect())
    }
}
