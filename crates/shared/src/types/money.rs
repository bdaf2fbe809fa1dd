//! Limits of stored money amounts.
//!
//! Every amount column is `DECIMAL(12, 2)`. Amounts outside these limits are
//! rejected before they reach the database, where they would be rounded or
//! overflow.

use rust_decimal::Decimal;

/// Decimal places kept for money (sen).
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a money column holds: 9,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// Returns true if `amount` fits a money column without rounding.
///
/// Trailing zeros do not count towards the scale, so `300.000` is accepted.
#[must_use]
pub fn is_storable_amount(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE && amount.abs() <= MAX_AMOUNT
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
