//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Payment validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Amount is zero or negative.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Amount has more than two decimal places or is too large to store.
    #[error("Payment amount {0} must have at most 2 decimal places and not exceed 9999999999.99")]
    UnstorableAmount(Decimal),

    /// The instance is already settled.
    #[error("Nothing is outstanding on this bill")]
    NothingOutstanding,

    /// Amount exceeds the outstanding balance.
    #[error("Payment of {amount} exceeds the outstanding amount of {outstanding}")]
    ExceedsOutstanding {
        /// Amount offered.
        amount: Decimal,
        /// Outstanding balance.
        outstanding: Decimal,
    },
}
