//! Provider abstractions and implementations.
//!
//! This module contains:
//! - The `ExchangeRateProvider` and `QuoteProvider` traits
//! - An HTTP rate source (`exchange_rate_api`)
//! - An HTTP quote source (`finnhub`)
//! - A deterministic mock quote source (`simulated`) for running without an API key

mod traits;

pub mod exchange_rate_api;
pub mod finnhub;
pub mod simulated;

#[cfg(test)]
pub(crate) mod test_support;

pub use traits::{ExchangeRateProvider, QuoteProvider};
