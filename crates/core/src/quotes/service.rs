use async_trait::async_trait;
use futures::future::join_all;
use nexus_market_data::{MarketDataError, QuoteProvider, StockQuote, SymbolMatch};
use std::collections::HashSet;
use std::sync::Arc;

use super::provider_settings::build_quote_provider;
use super::quote_cache::QuoteCache;
use crate::config::NexusConfig;
use crate::errors::Result;
use crate::utils::{Clock, SystemClock};

/// Contract for quote lookups.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Cached quote if younger than the freshness window, otherwise a fresh fetch.
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote>;

    /// Quotes for every symbol that could be fetched. Duplicates are collapsed
    /// and failures are skipped.
    async fn get_quotes(&self, symbols: &[String]) -> Vec<StockQuote>;

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>>;

    async fn invalidate(&self, symbol: &str);

    async fn clear(&self);
}

/// Trims and uppercases a ticker.
///
/// Empty symbols and symbols containing whitespace or control characters are
/// rejected.
pub fn normalize_symbol(symbol: &str) -> std::result::Result<String, MarketDataError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(MarketDataError::InvalidSymbol(symbol.to_string()));
    }
    Ok(trimmed.to_uppercase())
}

pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    cache: Arc<QuoteCache>,
    clock: Arc<dyn Clock>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_cache(provider, Arc::new(QuoteCache::default()))
    }

    pub fn with_cache(provider: Arc<dyn QuoteProvider>, cache: Arc<QuoteCache>) -> Self {
        Self {
            provider,
            cache,
            clock: Arc::new(SystemClock),
        }
    }

    /// Provider and freshness window as configured.
    pub fn from_config(config: &NexusConfig) -> Self {
        Self::with_cache(
            build_quote_provider(&config.quote_provider_settings()),
            Arc::new(QuoteCache::new(config.quote_ttl)),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    async fn quote_for_normalized(&self, symbol: &str) -> Result<StockQuote> {
        let now = self.clock.now();
        if let Some(quote) = self.cache.get_fresh(symbol, now).await {
            log::debug!("Quote cache hit for {}", symbol);
            return Ok(quote);
        }

        let quote = self.provider.get_quote(symbol).await?;
        self.cache.insert(symbol, quote.clone(), now).await;
        Ok(quote)
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote> {
        let symbol = normalize_symbol(symbol)?;
        self.quote_for_normalized(&symbol).await
    }

    async fn get_quotes(&self, symbols: &[String]) -> Vec<StockQuote> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(symbols.len());
        for raw in symbols {
            match normalize_symbol(raw) {
                Ok(symbol) => {
                    if seen.insert(symbol.clone()) {
                        unique.push(symbol);
                    }
                }
                Err(e) => log::warn!("Skipping quote: {}", e),
            }
        }

        let results = join_all(unique.iter().map(|symbol| self.quote_for_normalized(symbol))).await;

        unique
            .iter()
            .zip(results)
            .filter_map(|(symbol, result)| match result {
                Ok(quote) => Some(quote),
                Err(e) => {
                    log::warn!("Failed to fetch quote for {}: {}", symbol, e);
                    None
                }
            })
            .collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.provider.search(query).await?)
    }

    async fn invalidate(&self, symbol: &str) {
        if let Ok(symbol) = normalize_symbol(symbol) {
            self.cache.invalidate(&symbol).await;
        }
    }

    async fn clear(&self) {
        self.cache.clear().await;
    }
}
