//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while parsing or totalling prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The string could not be read as a localized amount.
    #[error("invalid localized price: {0}")]
    InvalidPrice(String),

    /// A line total or sum did not fit in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Parse a localized amount such as `"89,99"` or `"6,99 €"` into money.
///
/// Both `,` and `.` are accepted as the decimal separator. The amount is rounded to
/// whole minor units.
///
/// # Errors
///
/// Returns [`PricingError::InvalidPrice`] for empty, negative or non-numeric input.
pub fn parse_localized_price(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let trimmed = s.trim().trim_end_matches('€').trim_end();

    let amount = trimmed
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_err| PricingError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(PricingError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PricingError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Render an amount with two decimals and a comma separator, e.g. `"333,98"`.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    Decimal::new(money.to_minor_units(), 2)
        .to_string()
        .replace('.', ",")
}

/// Unit price multiplied by quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    unit_price: &Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, unit_price.currency()))
}

/// Sum of unit price times quantity over all lines.
///
/// An empty slice totals to zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total did not fit in minor units.
/// - [`PricingError::Money`]: a line is priced in a different currency.
pub fn total_price(
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line.line_total()?)?)
        })
}
