//! Currencies recognized by the application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// ISO 4217 currency code restricted to the currencies the app supports.
///
/// Rate payloads routinely carry 150+ codes; anything outside this set is
/// discarded while decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Gel,
    Jpy,
    Chf,
    Cad,
    Aud,
    Cny,
    Inr,
    Try,
    Rub,
    Uah,
    Pln,
    Sek,
    Aed,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 16] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Gel,
        CurrencyCode::Jpy,
        CurrencyCode::Chf,
        CurrencyCode::Cad,
        CurrencyCode::Aud,
        CurrencyCode::Cny,
        CurrencyCode::Inr,
        CurrencyCode::Try,
        CurrencyCode::Rub,
        CurrencyCode::Uah,
        CurrencyCode::Pln,
        CurrencyCode::Sek,
        CurrencyCode::Aed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Gel => "GEL",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Try => "TRY",
            CurrencyCode::Rub => "RUB",
            CurrencyCode::Uah => "UAH",
            CurrencyCode::Pln => "PLN",
            CurrencyCode::Sek => "SEK",
            CurrencyCode::Aed => "AED",
        }
    }

    /// Display symbol used when formatting amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Usd | CurrencyCode::Cad | CurrencyCode::Aud => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Gel => "₾",
            CurrencyCode::Jpy | CurrencyCode::Cny => "¥",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Inr => "₹",
            CurrencyCode::Try => "₺",
            CurrencyCode::Rub => "₽",
            CurrencyCode::Uah => "₴",
            CurrencyCode::Pln => "zł",
            CurrencyCode::Sek => "kr",
            CurrencyCode::Aed => "د.إ",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Gel => "Georgian Lari",
            CurrencyCode::Jpy => "Japanese Yen",
            CurrencyCode::Chf => "Swiss Franc",
            CurrencyCode::Cad => "Canadian Dollar",
            CurrencyCode::Aud => "Australian Dollar",
            CurrencyCode::Cny => "Chinese Yuan",
            CurrencyCode::Inr => "Indian Rupee",
            CurrencyCode::Try => "Turkish Lira",
            CurrencyCode::Rub => "Russian Ruble",
            CurrencyCode::Uah => "Ukrainian Hryvnia",
            CurrencyCode::Pln => "Polish Zloty",
            CurrencyCode::Sek => "Swedish Krona",
            CurrencyCode::Aed => "UAE Dirham",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        CurrencyCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| MarketDataError::DecodingFailed(format!("Unsupported currency: {}", s)))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = MarketDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
