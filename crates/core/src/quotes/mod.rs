//! Quotes module - live stock quotes behind a short-lived in-memory cache.

mod provider_settings;
mod quote_cache;
mod service;

#[cfg(test)]
mod service_tests;

pub use provider_settings::{build_quote_provider, QuoteProviderSettings};
pub use quote_cache::{CachedQuote, QuoteCache};
pub use service::{normalize_symbol, QuoteService, QuoteServiceTrait};

pub use nexus_market_data::{StockQuote, SymbolMatch};
