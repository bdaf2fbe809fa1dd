//! Fee catalog error types.

use rust_decimal::Decimal;
use tadika_shared::types::FeeItemId;
use thiserror::Error;

/// Fee catalog validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Name is blank.
    #[error("Name is required")]
    MissingName,

    /// Code is blank.
    #[error("Code is required")]
    MissingCode,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Amount has more than two decimal places or is too large to store.
    #[error("Amount {0} must have at most 2 decimal places and not exceed 9999999999.99")]
    UnstorableAmount(Decimal),

    /// Package has no items.
    #[error("A fee package needs at least one item")]
    EmptyPackage,

    /// Package line quantity is zero.
    #[error("Quantity must be at least 1 for fee item {0}")]
    ZeroQuantity(FeeItemId),

    /// The same fee item appears twice in a package.
    #[error("Fee item {0} appears more than once in the package")]
    DuplicateItem(FeeItemId),

    /// Inactive items cannot be added to packages.
    #[error("Fee item {0} is inactive")]
    InactiveFeeItem(FeeItemId),

    /// Upfront months outside the academic year.
    #[error("Upfront months must be between 1 and {max}, got {got}")]
    InvalidUpfrontMonths {
        /// Configured upfront months.
        got: u32,
        /// Months in the academic year.
        max: u32,
    },
}
