//! Billing instance planning.
//!
//! Turns a fee preview into the rows that still need to be persisted.
//! Generation only fills gaps: rows that already exist are never updated or
//! removed, so running it twice is a no-op.

pub mod error;
pub mod service;
pub mod types;

pub use error::BillingError;
pub use service::BillingService;
pub use types::{BillingPlan, ExistingInstances, PlannedMiscFee, PlannedMonthlyFee};
