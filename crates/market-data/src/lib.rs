//! Nexus Market Data Crate
//!
//! This crate talks to the outside world on behalf of the FX and quote
//! services in `nexus-core`.
//!
//! # Overview
//!
//! - Live exchange rates per base currency ([`ExchangeRateApiProvider`])
//! - Live stock quotes and symbol search ([`FinnhubProvider`])
//! - Deterministic mock quotes for keyless/offline use ([`SimulatedQuoteProvider`])
//!
//! # Architecture
//!
//! ```text
//! +------------------+        +------------------+
//! |   FxService      |        |  QuoteService    |   (nexus-core)
//! +------------------+        +------------------+
//!          |                           |
//!          v                           v
//! +----------------------+   +------------------+
//! | ExchangeRateProvider |   |  QuoteProvider   |   (this crate)
//! +----------------------+   +------------------+
//!          |                     |          |
//!          v                     v          v
//!   ExchangeRate-API          Finnhub   Simulated
//! ```
//!
//! Providers never retry. Every failure is returned as a [`MarketDataError`].

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{CurrencyCode, RateSnapshot, StockQuote, SymbolMatch};

pub use provider::exchange_rate_api::ExchangeRateApiProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::simulated::SimulatedQuoteProvider;
pub use provider::{ExchangeRateProvider, QuoteProvider};
