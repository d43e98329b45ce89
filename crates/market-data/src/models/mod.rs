//! Market data models
//!
//! - `currency` - recognized currencies (CurrencyCode)
//! - `rates` - rate payload for one base currency (RateSnapshot)
//! - `quote` - stock quote snapshot (StockQuote)
//! - `search` - symbol search results (SymbolMatch)

mod currency;
mod quote;
mod rates;
mod search;

pub use currency::CurrencyCode;
pub use quote::StockQuote;
pub use rates::RateSnapshot;
pub use search::SymbolMatch;
