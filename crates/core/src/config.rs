//! Runtime configuration read from the environment.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use nexus_market_data::provider::{exchange_rate_api, finnhub};
use nexus_market_data::{CurrencyCode, ExchangeRateApiProvider, ExchangeRateProvider};

use crate::constants::{
    DEFAULT_BASE_CURRENCY, HTTP_TIMEOUT, QUOTE_FRESHNESS_WINDOW, RATE_STALENESS_WINDOW,
};
use crate::errors::{Error, Result};
use crate::quotes::QuoteProviderSettings;

pub const ENV_DB_PATH: &str = "NEXUS_DB_PATH";
pub const ENV_RATES_BASE_URL: &str = "NEXUS_RATES_BASE_URL";
pub const ENV_QUOTES_BASE_URL: &str = "NEXUS_QUOTES_BASE_URL";
pub const ENV_FINNHUB_API_KEY: &str = "NEXUS_FINNHUB_API_KEY";
pub const ENV_RATE_STALENESS_SECS: &str = "NEXUS_RATE_STALENESS_SECS";
pub const ENV_QUOTE_TTL_SECS: &str = "NEXUS_QUOTE_TTL_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "NEXUS_HTTP_TIMEOUT_SECS";
pub const ENV_BASE_CURRENCY: &str = "NEXUS_BASE_CURRENCY";

const DEFAULT_DB_PATH: &str = "./db/nexus.db";

#[derive(Debug, Clone, PartialEq)]
pub struct NexusConfig {
    pub db_path: String,
    pub rates_base_url: String,
    pub quotes_base_url: String,
    /// `None` selects the simulated quote provider
    pub finnhub_api_key: Option<String>,
    pub rate_staleness: Duration,
    pub quote_ttl: Duration,
    pub http_timeout: Duration,
    pub base_currency: CurrencyCode,
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            rates_base_url: exchange_rate_api::DEFAULT_BASE_URL.to_string(),
            quotes_base_url: finnhub::DEFAULT_BASE_URL.to_string(),
            finnhub_api_key: None,
            rate_staleness: RATE_STALENESS_WINDOW,
            quote_ttl: QUOTE_FRESHNESS_WINDOW,
            http_timeout: HTTP_TIMEOUT,
            base_currency: DEFAULT_BASE_CURRENCY,
        }
    }
}

impl NexusConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset keys keep
    /// their defaults; set but unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_currency = match get(ENV_BASE_CURRENCY) {
            Some(raw) => CurrencyCode::from_str(&raw).map_err(|_| {
                Error::InvalidConfigValue(format!("{}={}", ENV_BASE_CURRENCY, raw))
            })?,
            None => defaults.base_currency,
        };

        Ok(Self {
            db_path: get(ENV_DB_PATH).unwrap_or(defaults.db_path),
            rates_base_url: get(ENV_RATES_BASE_URL).unwrap_or(defaults.rates_base_url),
            quotes_base_url: get(ENV_QUOTES_BASE_URL).unwrap_or(defaults.quotes_base_url),
            finnhub_api_key: get(ENV_FINNHUB_API_KEY),
            rate_staleness: seconds(&get, ENV_RATE_STALENESS_SECS)?
                .unwrap_or(defaults.rate_staleness),
            quote_ttl: seconds(&get, ENV_QUOTE_TTL_SECS)?.unwrap_or(defaults.quote_ttl),
            http_timeout: seconds(&get, ENV_HTTP_TIMEOUT_SECS)?.unwrap_or(defaults.http_timeout),
            base_currency,
        })
    }

    pub fn quote_provider_settings(&self) -> QuoteProviderSettings {
        match self.finnhub_api_key.as_deref() {
            Some(key) => QuoteProviderSettings::Finnhub {
                api_key: key.to_string(),
                base_url: self.quotes_base_url.clone(),
                timeout: self.http_timeout,
            },
            None => QuoteProviderSettings::Simulated,
        }
    }

    pub fn rate_provider(&self) -> Arc<dyn ExchangeRateProvider> {
        Arc::new(ExchangeRateApiProvider::with_base_url(
            self.rates_base_url.clone(),
            self.http_timeout,
        ))
    }
}

fn seconds<G>(get: &G, key: &str) -> Result<Option<Duration>>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(Error::InvalidConfigValue(format!("{}={}", key, raw))),
    }
}
