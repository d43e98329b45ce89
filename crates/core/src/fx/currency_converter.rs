//! Conversion between any two currencies of a single-base rate table.
//!
//! Tables only store rates relative to their base, so cross rates are
//! derived on the fly:
//!
//! | from       | to         | result                          |
//! |------------|------------|---------------------------------|
//! | X          | X          | amount                          |
//! | base       | X          | amount * rate(X)                |
//! | X          | base       | amount / rate(X)                |
//! | X          | Y          | amount / rate(X) * rate(Y)      |

use log::warn;
use nexus_market_data::CurrencyCode;
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use super::fx_model::ExchangeRateTable;

/// Converts `amount` from `from` into `to`.
///
/// A currency missing from the table is treated as having rate 1. The
/// result is then silently wrong; use [`try_convert`] to get an error
/// instead. A result too large for `Decimal` saturates at `Decimal::MAX`
/// (or `Decimal::MIN` for negative amounts).
pub fn convert(
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
    table: &ExchangeRateTable,
) -> Decimal {
    let rate = |code: CurrencyCode| {
        table.rate_for(code).unwrap_or_else(|| {
            warn!(
                "No {} rate in {} table, assuming 1.0 for {} -> {}",
                code, table.base, from, to
            );
            Decimal::ONE
        })
    };

    apply(amount, from, to, table.base, rate).unwrap_or_else(|| {
        warn!(
            "Converting {} {} -> {} overflows, saturating",
            amount, from, to
        );
        saturate(amount)
    })
}

/// Strict variant of [`convert`]: fails when a needed rate is missing or
/// the result does not fit in a `Decimal`.
pub fn try_convert(
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
    table: &ExchangeRateTable,
) -> Result<Decimal, FxError> {
    let mut missing = None;
    let converted = apply(amount, from, to, table.base, |code| {
        table.rate_for(code).unwrap_or_else(|| {
            missing = Some(code);
            Decimal::ONE
        })
    });

    if let Some(code) = missing {
        return Err(FxError::RateNotFound(format!(
            "No {} rate in {} table for {} -> {}",
            code, table.base, from, to
        )));
    }

    converted.ok_or_else(|| {
        FxError::ConversionOverflow(format!("{} {} -> {}", amount, from, to))
    })
}

/// Units of `to` per one unit of `from`.
pub fn cross_rate(
    from: CurrencyCode,
    to: CurrencyCode,
    table: &ExchangeRateTable,
) -> Result<Decimal, FxError> {
    try_convert(Decimal::ONE, from, to, table)
}

/// `None` on overflow.
fn apply(
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
    base: CurrencyCode,
    mut rate: impl FnMut(CurrencyCode) -> Decimal,
) -> Option<Decimal> {
    if from == to {
        return Some(amount);
    }

    if from == base {
        amount.checked_mul(rate(to))
    } else if to == base {
        amount.checked_div(rate(from))
    } else {
        let from_rate = rate(from);
        let to_rate = rate(to);
        amount.checked_div(from_rate)?.checked_mul(to_rate)
    }
}

fn saturate(amount: Decimal) -> Decimal {
    if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}
