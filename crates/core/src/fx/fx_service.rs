use super::currency_converter;
use super::fallback::fallback_table;
use super::fx_model::{ExchangeRateTable, RateSource};
use super::fx_traits::{FxServiceTrait, RateCacheRepositoryTrait};
use crate::config::NexusConfig;
use crate::constants::{DEFAULT_BASE_CURRENCY, RATE_STALENESS_WINDOW};
use crate::errors::Result;
use crate::utils::{Clock, SystemClock};
use async_trait::async_trait;
use nexus_market_data::{CurrencyCode, ExchangeRateProvider, MarketDataError};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Rate acquisition with a three-tier fallback: live, then cache, then the
/// static table.
#[derive(Clone)]
pub struct FxService {
    provider: Arc<dyn ExchangeRateProvider>,
    cache: Arc<dyn RateCacheRepositoryTrait>,
    clock: Arc<dyn Clock>,
    staleness_window: chrono::Duration,
    base_currency: CurrencyCode,
}

impl FxService {
    pub fn new(
        provider: Arc<dyn ExchangeRateProvider>,
        cache: Arc<dyn RateCacheRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            cache,
            clock: Arc::new(SystemClock),
            staleness_window: to_chrono(RATE_STALENESS_WINDOW),
            base_currency: DEFAULT_BASE_CURRENCY,
        }
    }

    /// Live rates from the configured source, persisted in `cache`.
    pub fn from_config(config: &NexusConfig, cache: Arc<dyn RateCacheRepositoryTrait>) -> Self {
        Self::new(config.rate_provider(), cache)
            .with_staleness_window(config.rate_staleness)
            .with_base_currency(config.base_currency)
    }

    /// Base used by [`FxServiceTrait::get_base_rates`].
    pub fn with_base_currency(mut self, base: CurrencyCode) -> Self {
        self.base_currency = base;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_staleness_window(mut self, window: Duration) -> Self {
        self.staleness_window = to_chrono(window);
        self
    }

    /// Cache failures are treated as a miss.
    fn read_cache(&self, base: CurrencyCode) -> Option<ExchangeRateTable> {
        match self.cache.get(base) {
            Ok(table) => table.map(|t| t.with_source(RateSource::Cached)),
            Err(e) => {
                log::error!("Failed to read cached {} rates: {}", base, e);
                None
            }
        }
    }

    async fn fetch_live(
        &self,
        base: CurrencyCode,
    ) -> std::result::Result<ExchangeRateTable, MarketDataError> {
        let snapshot = self.provider.fetch_rates(base).await?;
        // Stamp with our own clock so staleness is judged on one timeline
        let table = ExchangeRateTable::from_snapshot(snapshot, self.clock.now());

        if let Err(e) = self.cache.save(&table).await {
            log::error!("Failed to cache {} rates: {}", base, e);
        }

        Ok(table)
    }

    async fn live_or_fallback(
        &self,
        base: CurrencyCode,
        cached: Option<ExchangeRateTable>,
    ) -> ExchangeRateTable {
        match self.fetch_live(base).await {
            Ok(table) => {
                log::debug!(
                    "Fetched {} live rates for {} from {}",
                    table.rates().len(),
                    base,
                    self.provider.id()
                );
                table
            }
            Err(e) => match cached {
                Some(table) => {
                    log::warn!(
                        "Live {} rates unavailable ({}), using cache from {}",
                        base,
                        e,
                        table.fetched_at
                    );
                    table
                }
                None => {
                    log::warn!(
                        "Live {} rates unavailable ({}) and nothing cached, using fallback table",
                        base,
                        e
                    );
                    fallback_table(base)
                }
            },
        }
    }
}

fn to_chrono(window: Duration) -> chrono::Duration {
    chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::minutes(15))
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_rates(&self, base: CurrencyCode) -> Result<ExchangeRateTable> {
        let cached = self.read_cache(base);

        if let Some(table) = &cached {
            if !self.is_stale(table) {
                return Ok(table.clone());
            }
            log::debug!("Cached {} rates from {} are stale", base, table.fetched_at);
        }

        Ok(self.live_or_fallback(base, cached).await)
    }

    fn base_currency(&self) -> CurrencyCode {
        self.base_currency
    }

    async fn get_base_rates(&self) -> Result<ExchangeRateTable> {
        self.get_rates(self.base_currency).await
    }

    async fn refresh_rates(&self, base: CurrencyCode) -> Result<ExchangeRateTable> {
        let cached = self.read_cache(base);
        Ok(self.live_or_fallback(base, cached).await)
    }

    async fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Decimal> {
        if from == to {
            return Ok(amount);
        }

        let table = self.get_rates(from).await?;
        Ok(currency_converter::convert(amount, from, to, &table))
    }

    fn is_stale(&self, table: &ExchangeRateTable) -> bool {
        table.is_stale_at(self.clock.now(), self.staleness_window)
    }
}
