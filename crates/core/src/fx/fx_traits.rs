use super::fx_model::ExchangeRateTable;
use crate::errors::Result;
use async_trait::async_trait;
use nexus_market_data::CurrencyCode;
use rust_decimal::Decimal;

/// Trait defining the contract for the persisted rate cache.
///
/// At most one record exists per base currency. The cache stores tables
/// as-is and never judges staleness.
#[async_trait]
pub trait RateCacheRepositoryTrait: Send + Sync {
    /// Returns the cached table for `base`, tagged [`RateSource::Cached`](super::RateSource::Cached).
    fn get(&self, base: CurrencyCode) -> Result<Option<ExchangeRateTable>>;

    /// Upserts the table under its base currency.
    async fn save(&self, table: &ExchangeRateTable) -> Result<ExchangeRateTable>;

    async fn delete(&self, base: CurrencyCode) -> Result<()>;

    fn list_bases(&self) -> Result<Vec<CurrencyCode>>;

    /// Removes every record; returns how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Best available table for `base`: fresh cache, then live, then stale
    /// cache, then the static fallback.
    async fn get_rates(&self, base: CurrencyCode) -> Result<ExchangeRateTable>;

    /// The configured home currency.
    fn base_currency(&self) -> CurrencyCode;

    /// [`get_rates`](Self::get_rates) for [`base_currency`](Self::base_currency).
    async fn get_base_rates(&self) -> Result<ExchangeRateTable>;

    /// Like [`get_rates`](Self::get_rates) but always attempts a live fetch first.
    async fn refresh_rates(&self, base: CurrencyCode) -> Result<ExchangeRateTable>;

    async fn convert(&self, amount: Decimal, from: CurrencyCode, to: CurrencyCode)
        -> Result<Decimal>;

    fn is_stale(&self, table: &ExchangeRateTable) -> bool;
}
