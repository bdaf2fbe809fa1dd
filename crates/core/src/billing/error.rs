//! Billing error types.

use thiserror::Error;

/// Billing generation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// The enrollment has no fee package.
    #[error("Fee package required before generating bills")]
    FeePackageRequired,

    /// The academic year has no months.
    #[error("Academic year must have at least one month")]
    NoAcademicMonths,
}
