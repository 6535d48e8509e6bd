//! Currency conversion through a shared-base rate table.
//!
//! Rate tables only ever relate currencies to one base, so converting
//! between two arbitrary currencies goes through that base: the amount is
//! first expressed in the base currency, then projected into the target.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::RateTable;

/// Converts `amount` from one currency to another using `table`.
///
/// # Arguments
///
/// * `amount` - The amount to convert, in `from`
/// * `from` - The currency `amount` is expressed in
/// * `to` - The currency to convert into
/// * `table` - Rates relative to `table.base`
///
/// # Returns
///
/// The converted amount. Same-currency conversions and conversions between
/// currencies with identical rates return `amount` untouched.
///
/// # Errors
///
/// * [`EngineError::CurrencyNotFound`] if either currency is neither the
///   table's base nor one of its entries
/// * [`EngineError::InvalidRate`] if either rate is zero or negative, or
///   the arithmetic overflows
///
/// # Examples
///
/// ```
/// use expense_policy::evaluation::convert;
/// use expense_policy::models::RateTable;
/// use rust_decimal::Decimal;
///
/// let table = RateTable::new(
///     "USD",
///     [("EUR", Decimal::new(5, 1)), ("CLP", Decimal::new(1000, 0))],
/// );
///
/// // Into the base currency
/// let usd = convert(Decimal::new(2000, 0), "CLP", "USD", &table).unwrap();
/// assert_eq!(usd, Decimal::new(2, 0));
///
/// // Between two non-base currencies
/// let eur = convert(Decimal::new(2000, 0), "CLP", "EUR", &table).unwrap();
/// assert_eq!(eur, Decimal::new(1, 0));
/// ```
pub fn convert(amount: Decimal, from: &str, to: &str, table: &RateTable) -> EngineResult<Decimal> {
    if from == to {
        return Ok(amount);
    }

    let from_rate = resolve_rate(table, from)?;
    let to_rate = resolve_rate(table, to)?;

    if from_rate == to_rate {
        return Ok(amount);
    }

    let in_base = amount
        .checked_div(from_rate)
        .ok_or_else(|| EngineError::InvalidRate {
            currency: from.to_string(),
            rate: from_rate.to_string(),
        })?;

    in_base
        .checked_mul(to_rate)
        .ok_or_else(|| EngineError::InvalidRate {
            currency: to.to_string(),
            rate: to_rate.to_string(),
        })
}

fn resolve_rate(table: &RateTable, currency: &str) -> EngineResult<Decimal> {
    let rate = table
        .rate_for(currency)
        .ok_or_else(|| EngineError::CurrencyNotFound {
            currency: currency.to_string(),
        })?;

    if rate <= Decimal::ZERO {
        return Err(EngineError::InvalidRate {
            currency: currency.to_string(),
            rate: rate.to_string(),
        });
    }
    Ok(rate)
}
