//! Fee preview data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_shared::types::{EnrollmentId, FeeItemId, FeePackageId};

use crate::catalog::{ChargeType, FeePackage};

/// A manual override of one fee item for one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAdjustment {
    /// Fee item being adjusted.
    pub fee_item_id: FeeItemId,
    /// Signed delta applied to the base cost; negative is a discount.
    pub amount: Decimal,
    /// Replacement quantity.
    pub quantity: Option<u32>,
    /// Why the override exists.
    pub reason: Option<String>,
}

/// Everything the preview engine needs about one enrollment.
#[derive(Debug, Clone)]
pub struct EnrollmentFees {
    /// Enrollment ID.
    pub enrollment_id: EnrollmentId,
    /// New students are never auto-waived.
    pub is_new_student: bool,
    /// Bound fee package, if any.
    pub package: Option<FeePackage>,
    /// Manual overrides keyed by fee item.
    pub adjustments: Vec<FeeAdjustment>,
}

/// Where a line's adjustment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSource {
    /// No adjustment applied.
    None,
    /// An explicit enrollment override.
    Manual,
    /// The returning-student waiver.
    AutomaticWaiver,
}

/// One priced line of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    /// Fee item ID.
    pub fee_item_id: FeeItemId,
    /// Fee item name.
    pub name: String,
    /// Fee item code.
    pub code: String,
    /// Charge type bucket.
    pub charge_type: ChargeType,
    /// Resolved unit price.
    pub unit_price: Decimal,
    /// Resolved quantity.
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub base_cost: Decimal,
    /// Signed delta applied to the base cost.
    pub adjustment_amount: Decimal,
    /// Origin of the delta.
    pub adjustment_source: AdjustmentSource,
    /// Reason recorded on a manual override.
    pub adjustment_reason: Option<String>,
    /// True for manual overrides, including zero-amount ones.
    pub is_adjusted: bool,
    /// True for automatic returning-student waivers.
    pub is_waiver: bool,
    /// `max(0, base_cost + adjustment_amount)`.
    pub final_cost: Decimal,
}

/// Computed fees for an enrollment bound to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePreview {
    /// Enrollment ID.
    pub enrollment_id: EnrollmentId,
    /// Bound package ID.
    pub package_id: FeePackageId,
    /// Bound package name.
    pub package_name: String,
    /// One-time lines.
    pub one_time_fees: Vec<FeeLine>,
    /// Monthly lines, priced per month.
    pub monthly_fees: Vec<FeeLine>,
    /// Sum of one-time final costs.
    pub total_one_time: Decimal,
    /// Sum of monthly final costs for a single month.
    pub total_monthly_per_month: Decimal,
    /// Months collected upfront.
    pub upfront_months: u32,
    /// `total_monthly_per_month * upfront_months`.
    pub total_monthly_upfront: Decimal,
    /// `total_one_time + total_monthly_upfront`.
    pub grand_total: Decimal,
}

/// Result of previewing an enrollment's fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewOutcome {
    /// The enrollment has no fee package yet.
    NoPackage {
        /// Enrollment ID.
        enrollment_id: EnrollmentId,
    },
    /// Fees were computed.
    Ready(FeePreview),
}

impl PreviewOutcome {
    /// Returns the preview if a package is bound.
    #[must_use]
    pub const fn preview(&self) -> Option<&FeePreview> {
        match self {
            Self::NoPackage { .. } => None,
            Self::Ready(preview) => Some(preview),
        }
    }
}
