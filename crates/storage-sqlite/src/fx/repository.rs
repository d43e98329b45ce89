use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::{debug, warn};
use nexus_core::fx::{CurrencyCode, ExchangeRateTable, RateCacheRepositoryTrait, RateSource};
use nexus_core::{Error, Result};

use super::model::CachedRateRecordDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::exchange_rate_cache;

/// SQLite-backed rate cache. Reads go through the pool, writes through the
/// single writer actor.
#[derive(Clone)]
pub struct RateCacheRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RateCacheRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RateCacheRepositoryTrait for RateCacheRepository {
    fn get(&self, base: CurrencyCode) -> Result<Option<ExchangeRateTable>> {
        let mut conn = get_connection(&self.pool)?;

        let record = exchange_rate_cache::table
            .find(base.as_str())
            .select(CachedRateRecordDB::as_select())
            .first::<CachedRateRecordDB>(&mut conn)
            .optional()
            .into_core()?;

        match record {
            Some(record) => Ok(Some(record.into_table()?)),
            None => Ok(None),
        }
    }

    async fn save(&self, table: &ExchangeRateTable) -> Result<ExchangeRateTable> {
        if table.source == RateSource::Fallback {
            warn!("Refusing to cache fallback rates for {}", table.base);
            return Ok(table.clone());
        }

        let record = CachedRateRecordDB::from_table(table, Utc::now()).map_err(Error::from)?;
        debug!(
            "Caching {} rates for {} fetched at {}",
            table.rates().len(),
            record.base_currency,
            record.fetched_at
        );

        self.writer
            .exec(move |conn| {
                diesel::insert_into(exchange_rate_cache::table)
                    .values(&record)
                    .on_conflict(exchange_rate_cache::base_currency)
                    .do_update()
                    .set((
                        exchange_rate_cache::rates.eq(&record.rates),
                        exchange_rate_cache::fetched_at.eq(&record.fetched_at),
                        exchange_rate_cache::updated_at.eq(&record.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = exchange_rate_cache::table
                    .find(&record.base_currency)
                    .select(CachedRateRecordDB::as_select())
                    .first::<CachedRateRecordDB>(conn)
                    .map_err(StorageError::from)?;

                Ok(stored.into_table()?)
            })
            .await
    }

    async fn delete(&self, base: CurrencyCode) -> Result<()> {
        let code = base.as_str().to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(exchange_rate_cache::table.find(code))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn list_bases(&self) -> Result<Vec<CurrencyCode>> {
        let mut conn = get_connection(&self.pool)?;

        let codes = exchange_rate_cache::table
            .select(exchange_rate_cache::base_currency)
            .order(exchange_rate_cache::base_currency.asc())
            .load::<String>(&mut conn)
            .into_core()?;

        Ok(codes
            .iter()
            .filter_map(|code| CurrencyCode::from_str(code).ok())
            .collect())
    }

    async fn clear(&self) -> Result<usize> {
        self.writer
            .exec(|conn| {
                let removed = diesel::delete(exchange_rate_cache::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }
}
