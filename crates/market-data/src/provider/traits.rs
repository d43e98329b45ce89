//! Provider trait definitions.
//!
//! Rate sources and quote sources are separate seams: the FX path only ever
//! needs [`ExchangeRateProvider`], the quote cache only [`QuoteProvider`].

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, RateSnapshot, StockQuote, SymbolMatch};

/// Source of live exchange rates.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the latest rates expressed against `base`.
    ///
    /// The returned snapshot only contains recognized currencies and never
    /// contains `base` itself.
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, MarketDataError>;
}

/// Source of stock quotes.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use nexus_market_data::provider::QuoteProvider;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "FINNHUB" or "SIMULATED". It ends up
    /// in [`StockQuote::source`].
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for an already-normalized symbol.
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError>;

    /// Search for symbols matching the query.
    ///
    /// Default implementation returns no matches.
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let _ = query;
        Ok(Vec::new())
    }
}
