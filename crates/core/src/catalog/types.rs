//! Fee catalog data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_shared::types::{AcademicYearId, FeeItemId, FeePackageId};

/// How often a fee item is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeType {
    /// Charged once per enrollment.
    OneTime,
    /// Charged every month of the academic year.
    Monthly,
}

/// Billing period a package is sold for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    /// Paid month by month.
    Monthly,
    /// Paid per school term.
    Termly,
    /// Paid for the whole year.
    Yearly,
}

/// A single chargeable line in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeItem {
    /// Fee item ID.
    pub id: FeeItemId,
    /// Display name (e.g., "Registration Fee").
    pub name: String,
    /// Unique short code.
    pub code: String,
    /// Price used when a package does not override it.
    pub default_amount: Decimal,
    /// One-time or monthly.
    pub charge_type: ChargeType,
    /// Returning students are not charged for this item unless overridden.
    pub is_waivable_for_returning_students: bool,
    /// Inactive items stay on existing packages but cannot be added to new ones.
    pub is_active: bool,
}

/// A fee item as it appears inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePackageItem {
    /// The catalog item.
    pub fee_item: FeeItem,
    /// Number of units billed.
    pub quantity: u32,
    /// Package-specific unit price.
    pub unit_amount: Option<Decimal>,
}

impl FeePackageItem {
    /// Unit price: the package override if set, else the item's default.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_amount.unwrap_or(self.fee_item.default_amount)
    }
}

/// How many months of monthly fees are collected at enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRule {
    /// Months billed upfront.
    pub upfront_months: u32,
}

/// A bundle of fee items for one level, program, billing period and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePackage {
    /// Package ID.
    pub id: FeePackageId,
    /// Package name.
    pub name: String,
    /// Level (e.g., "K1").
    pub level: String,
    /// Program type (e.g., "full_day").
    pub program_type: String,
    /// Billing period.
    pub billing_period: BillingPeriod,
    /// Academic year the package is sold for.
    pub academic_year_id: AcademicYearId,
    /// Whether new enrollments may bind to it.
    pub is_active: bool,
    /// Items in display order.
    pub items: Vec<FeePackageItem>,
    /// Optional upfront collection rule.
    pub collection_rule: Option<CollectionRule>,
}

impl FeePackage {
    /// Months of monthly fees billed upfront; one when no rule is configured.
    #[must_use]
    pub fn upfront_months(&self) -> u32 {
        self.collection_rule.map_or(1, |rule| rule.upfront_months)
    }
}

/// A line of a package being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackageLine {
    /// Catalog item to include.
    pub fee_item_id: FeeItemId,
    /// Number of units.
    pub quantity: u32,
    /// Optional unit price override.
    pub unit_amount: Option<Decimal>,
}
