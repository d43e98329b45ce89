use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time price snapshot for a tradable symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,

    /// Current/last price
    pub price: Decimal,

    /// Absolute change against the previous close
    pub change: Decimal,

    /// Percent change against the previous close
    pub change_percent: Decimal,

    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub previous_close: Decimal,

    /// Trading volume, zero when the provider does not report it
    pub volume: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Decimal>,

    /// Time of the quote as reported by the provider
    pub timestamp: DateTime<Utc>,

    /// Provider that produced the quote (FINNHUB, SIMULATED)
    pub source: String,
}

impl StockQuote {
    /// Whether the price moved up against the previous close.
    pub fn is_up(&self) -> bool {
        self.change.is_sign_positive() && !self.change.is_zero()
    }
}
