//! FX (Foreign Exchange) module - rate tables, conversion, and the rate service.

pub mod currency_converter;
pub mod fallback;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;


pub use currency_converter::{convert, cross_rate, try_convert};
pub use fallback::fallback_table;
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRateTable, RateSource};
pub use fx_service::FxService;
pub use fx_traits::{FxServiceTrait, RateCacheRepositoryTrait};
pub use nexus_market_data::CurrencyCode;
