//! Conversion between integer minor currency units and decimal amounts.
//!
//! The API stores every amount as an integer count of cents. Display values are
//! derived with `rust_decimal` so that `12345` always becomes exactly `123.45`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places in a display amount.
pub const CENT_SCALE: u32 = 2;

/// Convert minor units (cents) to a decimal amount rounded half-up to two places.
pub fn minor_units_to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, CENT_SCALE)
        .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a decimal amount to minor units, rounding half-up to the nearest cent.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn decimal_to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
