//! Static approximate rates used when neither the network nor the cache
//! can provide a table.

use nexus_market_data::CurrencyCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::fx_model::{ExchangeRateTable, RateSource};
use crate::constants::RATE_DECIMAL_PRECISION;

/// Units of each currency per 1 USD.
const USD_RATES: [(CurrencyCode, Decimal); 16] = [
    (CurrencyCode::Usd, dec!(1.0)),
    (CurrencyCode::Eur, dec!(0.92)),
    (CurrencyCode::Gbp, dec!(0.79)),
    (CurrencyCode::Gel, dec!(2.70)),
    (CurrencyCode::Jpy, dec!(149.50)),
    (CurrencyCode::Chf, dec!(0.88)),
    (CurrencyCode::Cad, dec!(1.36)),
    (CurrencyCode::Aud, dec!(1.52)),
    (CurrencyCode::Cny, dec!(7.24)),
    (CurrencyCode::Inr, dec!(83.10)),
    (CurrencyCode::Try, dec!(32.20)),
    (CurrencyCode::Rub, dec!(92.50)),
    (CurrencyCode::Uah, dec!(38.50)),
    (CurrencyCode::Pln, dec!(3.98)),
    (CurrencyCode::Sek, dec!(10.40)),
    (CurrencyCode::Aed, dec!(3.67)),
];

fn usd_rate(code: CurrencyCode) -> Decimal {
    USD_RATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, rate)| *rate)
        .unwrap_or(Decimal::ONE)
}

/// Approximate table for `base`, rebased from the USD figures.
///
/// The table carries [`ExchangeRateTable::FALLBACK_TIMESTAMP`] and is never
/// considered stale.
pub fn fallback_table(base: CurrencyCode) -> ExchangeRateTable {
    let base_rate = usd_rate(base);
    let rates = USD_RATES
        .iter()
        .filter(|(code, _)| *code != base)
        .map(|(code, rate)| (*code, (*rate / base_rate).round_dp(RATE_DECIMAL_PRECISION)));

    ExchangeRateTable::new(
        base,
        rates,
        ExchangeRateTable::FALLBACK_TIMESTAMP,
        RateSource::Fallback,
    )
}
