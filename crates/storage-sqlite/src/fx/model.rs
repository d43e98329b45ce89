//! Database model for cached rate tables.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use nexus_core::fx::{CurrencyCode, ExchangeRateTable, FxError, RateSource};
use rust_decimal::Decimal;

use crate::errors::StorageError;

/// One row per base currency.
///
/// `rates` is a JSON object of currency code to decimal string. Strings keep
/// the exact decimal value; JSON numbers would round-trip through f64.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::exchange_rate_cache)]
#[diesel(primary_key(base_currency))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CachedRateRecordDB {
    pub base_currency: String,
    pub rates: String,
    pub fetched_at: String,
    pub updated_at: String,
}

impl CachedRateRecordDB {
    pub fn from_table(
        table: &ExchangeRateTable,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, StorageError> {
        let rates: BTreeMap<&str, String> = table
            .rates()
            .iter()
            .map(|(code, rate)| (code.as_str(), rate.to_string()))
            .collect();

        Ok(Self {
            base_currency: table.base.as_str().to_string(),
            rates: serde_json::to_string(&rates)?,
            fetched_at: table.fetched_at.to_rfc3339(),
            updated_at: updated_at.to_rfc3339(),
        })
    }

    /// Decodes the row. Codes this build does not recognize are skipped.
    pub fn into_table(self) -> Result<ExchangeRateTable, FxError> {
        let corrupt =
            |what: &str| FxError::CorruptCacheRecord(format!("{}: {}", self.base_currency, what));

        let base = CurrencyCode::from_str(&self.base_currency)
            .map_err(|_| corrupt("unknown base currency"))?;

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&self.rates).map_err(|e| corrupt(&e.to_string()))?;

        let mut rates = Vec::with_capacity(raw.len());
        for (code, rate) in raw {
            let Ok(code) = CurrencyCode::from_str(&code) else {
                log::warn!("Ignoring unknown currency {} in cached {} rates", code, base);
                continue;
            };
            let rate = Decimal::from_str(&rate)
                .map_err(|e| corrupt(&format!("rate for {}: {}", code, e)))?;
            rates.push((code, rate));
        }

        let fetched_at = DateTime::parse_from_rfc3339(&self.fetched_at)
            .map_err(|e| corrupt(&format!("fetched_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(ExchangeRateTable::new(
            base,
            rates,
            fetched_at,
            RateSource::Cached,
        ))
    }
}
