use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;

/// Rates for one base currency as returned by a rate source.
///
/// The base currency itself is never present in `rates`; its rate is
/// implicitly 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    pub fetched_at: DateTime<Utc>,
}
