//! Billing plan data types.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_shared::types::FeeItemId;

use crate::payments::PaymentStatus;

/// Instances already generated for an enrollment.
#[derive(Debug, Clone, Default)]
pub struct ExistingInstances {
    /// Names of existing one-time fees.
    pub misc_fee_names: HashSet<String>,
    /// `(fee item, month)` pairs of existing monthly instances.
    pub monthly: HashSet<(FeeItemId, u32)>,
}

/// A one-time fee to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMiscFee {
    /// Source fee item.
    pub fee_item_id: FeeItemId,
    /// Name the instance is tracked by.
    pub name: String,
    /// Amount billed.
    pub amount_due: Decimal,
    /// Initial status.
    pub status: PaymentStatus,
}

/// A monthly fee instance to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMonthlyFee {
    /// Source fee item.
    pub fee_item_id: FeeItemId,
    /// Fee item name at generation time.
    pub name: String,
    /// Month number within the academic year, starting at 1.
    pub month: u32,
    /// Amount billed.
    pub amount_due: Decimal,
    /// Initial status.
    pub status: PaymentStatus,
}

/// Rows missing for an enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPlan {
    /// One-time fees to insert.
    pub misc_fees: Vec<PlannedMiscFee>,
    /// Monthly instances to insert.
    pub monthly_fees: Vec<PlannedMonthlyFee>,
}

impl BillingPlan {
    /// True when nothing needs to be created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.misc_fees.is_empty() && self.monthly_fees.is_empty()
    }

    /// Number of rows to create.
    #[must_use]
    pub fn len(&self) -> usize {
        self.misc_fees.len() + self.monthly_fees.len()
    }
}
