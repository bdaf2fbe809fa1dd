//! Fee preview engine.
//!
//! Prices every item of an enrollment's package, applies manual overrides or
//! the returning-student waiver, and totals the one-time and monthly buckets.
//! The result is side-effect free and always reflects the current catalog.

use rust_decimal::Decimal;

use super::types::{
    AdjustmentSource, EnrollmentFees, FeeAdjustment, FeeLine, FeePreview, PreviewOutcome,
};
use crate::catalog::{ChargeType, FeePackageItem};

/// Fee preview calculation.
pub struct FeePreviewEngine;

impl FeePreviewEngine {
    /// Computes the fee preview for an enrollment.
    ///
    /// Returns `PreviewOutcome::NoPackage` when no package is bound.
    #[must_use]
    pub fn preview(fees: &EnrollmentFees) -> PreviewOutcome {
        let Some(package) = &fees.package else {
            return PreviewOutcome::NoPackage {
                enrollment_id: fees.enrollment_id,
            };
        };

        let mut one_time_fees = Vec::new();
        let mut monthly_fees = Vec::new();

        for item in &package.items {
            let adjustment = fees
                .adjustments
                .iter()
                .find(|adj| adj.fee_item_id == item.fee_item.id);
            let line = Self::price_line(item, adjustment, fees.is_new_student);

            match line.charge_type {
                ChargeType::OneTime => one_time_fees.push(line),
                ChargeType::Monthly => monthly_fees.push(line),
            }
        }

        let total_one_time: Decimal = one_time_fees.iter().map(|l| l.final_cost).sum();
        let total_monthly_per_month: Decimal = monthly_fees.iter().map(|l| l.final_cost).sum();
        let upfront_months = package.upfront_months();
        let total_monthly_upfront = total_monthly_per_month * Decimal::from(upfront_months);

        PreviewOutcome::Ready(FeePreview {
            enrollment_id: fees.enrollment_id,
            package_id: package.id,
            package_name: package.name.clone(),
            one_time_fees,
            monthly_fees,
            total_one_time,
            total_monthly_per_month,
            upfront_months,
            total_monthly_upfront,
            grand_total: total_one_time + total_monthly_upfront,
        })
    }

    /// Prices a single package item.
    ///
    /// A manual adjustment always wins over the automatic waiver, even when
    /// its delta is zero. The final cost never drops below zero.
    #[must_use]
    pub fn price_line(
        item: &FeePackageItem,
        adjustment: Option<&FeeAdjustment>,
        is_new_student: bool,
    ) -> FeeLine {
        let unit_price = item.unit_price();
        let quantity = adjustment
            .and_then(|adj| adj.quantity)
            .unwrap_or(item.quantity);
        let base_cost = unit_price * Decimal::from(quantity);

        let (adjustment_amount, adjustment_source, adjustment_reason) = match adjustment {
            Some(adj) => (adj.amount, AdjustmentSource::Manual, adj.reason.clone()),
            None if item.fee_item.is_waivable_for_returning_students && !is_new_student => {
                (-base_cost, AdjustmentSource::AutomaticWaiver, None)
            }
            None => (Decimal::ZERO, AdjustmentSource::None, None),
        };

        let final_cost = (base_cost + adjustment_amount).max(Decimal::ZERO);

        FeeLine {
            fee_item_id: item.fee_item.id,
            name: item.fee_item.name.clone(),
            code: item.fee_item.code.clone(),
            charge_type: item.fee_item.charge_type,
            unit_price,
            quantity,
            base_cost,
            adjustment_amount,
            adjustment_source,
            adjustment_reason,
            is_adjusted: adjustment_source == AdjustmentSource::Manual,
            is_waiver: adjustment_source == AdjustmentSource::AutomaticWaiver,
            final_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BillingPeriod, CollectionRule, FeeItem, FeePackage};
    use rust_decimal_macros::dec;
    use tadika_shared::types::{AcademicYearId, EnrollmentId, FeeItemId, FeePackageId};

    fn fee_item(name: &str, amount: Decimal, charge_type: ChargeType, waivable: bool) -> FeeItem {
        FeeItem {
            id: FeeItemId::new(),
            name: name.to_string(),
            code: name.to_uppercase(),
            default_amount: amount,
            charge_type,
            is_waivable_for_returning_students: waivable,
            is_active: true,
        }
    }

    fn package(items: Vec<FeePackageItem>, upfront: Option<u32>) -> FeePackage {
        FeePackage {
            id: FeePackageId::new(),
            name: "K1 Full Day".to_string(),
            level: "K1".to_string(),
            program_type: "full_day".to_string(),
            billing_period: BillingPeriod::Monthly,
            academic_year_id: AcademicYearId::new(),
            is_active: true,
            items,
            collection_rule: upfront.map(|upfront_months| CollectionRule { upfront_months }),
        }
    }

    fn single(item: FeeItem) -> FeePackageItem {
        FeePackageItem {
            fee_item: item,
            quantity: 1,
            unit_amount: None,
        }
    }

    fn enrollment(
        is_new_student: bool,
        package: Option<FeePackage>,
        adjustments: Vec<FeeAdjustment>,
    ) -> EnrollmentFees {
        EnrollmentFees {
            enrollment_id: EnrollmentId::new(),
            is_new_student,
            package,
            adjustments,
        }
    }

    fn ready(outcome: &PreviewOutcome) -> &FeePreview {
        outcome.preview().expect("package is bound")
    }

    #[test]
    fn test_returning_student_registration_is_waived() {
        let registration = fee_item("Registration", dec!(200), ChargeType::OneTime, true);
        let fees = enrollment(false, Some(package(vec![single(registration)], None)), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        let preview = ready(&outcome);

        assert_eq!(preview.one_time_fees.len(), 1);
        let line = &preview.one_time_fees[0];
        assert_eq!(line.base_cost, dec!(200));
        assert_eq!(line.adjustment_amount, dec!(-200));
        assert_eq!(line.final_cost, dec!(0));
        assert!(line.is_waiver);
        assert!(!line.is_adjusted);
        assert_eq!(preview.total_one_time, dec!(0));
    }

    #[test]
    fn test_new_student_registration_is_charged() {
        let registration = fee_item("Registration", dec!(200), ChargeType::OneTime, true);
        let fees = enrollment(true, Some(package(vec![single(registration)], None)), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        let line = &ready(&outcome).one_time_fees[0];

        assert_eq!(line.final_cost, dec!(200));
        assert!(!line.is_waiver);
        assert_eq!(line.adjustment_source, AdjustmentSource::None);
    }

    #[test]
    fn test_monthly_upfront_uses_collection_rule() {
        let tuition = fee_item("Tuition", dec!(300), ChargeType::Monthly, false);
        let fees = enrollment(true, Some(package(vec![single(tuition)], Some(3))), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        let preview = ready(&outcome);

        assert_eq!(preview.total_monthly_per_month, dec!(300));
        assert_eq!(preview.upfront_months, 3);
        assert_eq!(preview.total_monthly_upfront, dec!(900));
        assert_eq!(preview.grand_total, dec!(900));
    }

    #[test]
    fn test_upfront_defaults_to_one_month() {
        let tuition = fee_item("Tuition", dec!(300), ChargeType::Monthly, false);
        let fees = enrollment(true, Some(package(vec![single(tuition)], None)), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        assert_eq!(ready(&outcome).upfront_months, 1);
        assert_eq!(ready(&outcome).total_monthly_upfront, dec!(300));
    }

    #[test]
    fn test_manual_adjustment_beats_waiver() {
        let registration = fee_item("Registration", dec!(200), ChargeType::OneTime, true);
        let adjustment = FeeAdjustment {
            fee_item_id: registration.id,
            amount: dec!(-50),
            quantity: None,
            reason: Some("Sibling discount".to_string()),
        };
        let fees = enrollment(
            false,
            Some(package(vec![single(registration)], None)),
            vec![adjustment],
        );

        let outcome = FeePreviewEngine::preview(&fees);
        let line = &ready(&outcome).one_time_fees[0];

        assert_eq!(line.final_cost, dec!(150));
        assert!(line.is_adjusted);
        assert!(!line.is_waiver);
        assert_eq!(line.adjustment_reason.as_deref(), Some("Sibling discount"));
    }

    #[test]
    fn test_zero_adjustment_with_quantity_counts_as_adjusted() {
        let books = fee_item("Books", dec!(40), ChargeType::OneTime, true);
        let adjustment = FeeAdjustment {
            fee_item_id: books.id,
            amount: dec!(0),
            quantity: Some(3),
            reason: None,
        };
        let fees = enrollment(
            false,
            Some(package(vec![single(books)], None)),
            vec![adjustment],
        );

        let outcome = FeePreviewEngine::preview(&fees);
        let line = &ready(&outcome).one_time_fees[0];

        assert_eq!(line.quantity, 3);
        assert_eq!(line.base_cost, dec!(120));
        assert_eq!(line.final_cost, dec!(120));
        assert!(line.is_adjusted);
        assert!(!line.is_waiver);
    }

    #[test]
    fn test_discount_larger_than_cost_floors_to_zero() {
        let tuition = fee_item("Tuition", dec!(300), ChargeType::Monthly, false);
        let adjustment = FeeAdjustment {
            fee_item_id: tuition.id,
            amount: dec!(-500),
            quantity: None,
            reason: None,
        };
        let fees = enrollment(true, Some(package(vec![single(tuition)], None)), vec![adjustment]);

        let outcome = FeePreviewEngine::preview(&fees);
        assert_eq!(ready(&outcome).monthly_fees[0].final_cost, dec!(0));
    }

    #[test]
    fn test_package_unit_override_and_quantity() {
        let meals = fee_item("Meals", dec!(5), ChargeType::Monthly, false);
        let item = FeePackageItem {
            fee_item: meals,
            quantity: 20,
            unit_amount: Some(dec!(4.50)),
        };
        let fees = enrollment(true, Some(package(vec![item], None)), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        let line = &ready(&outcome).monthly_fees[0];
        assert_eq!(line.unit_price, dec!(4.50));
        assert_eq!(line.final_cost, dec!(90.00));
    }

    #[test]
    fn test_lines_routed_by_charge_type() {
        let items = vec![
            single(fee_item("Registration", dec!(200), ChargeType::OneTime, false)),
            single(fee_item("Tuition", dec!(300), ChargeType::Monthly, false)),
            single(fee_item("Uniform", dec!(80), ChargeType::OneTime, false)),
            single(fee_item("Transport", dec!(120), ChargeType::Monthly, false)),
        ];
        let fees = enrollment(true, Some(package(items, Some(2))), vec![]);

        let outcome = FeePreviewEngine::preview(&fees);
        let preview = ready(&outcome);

        assert_eq!(preview.one_time_fees.len(), 2);
        assert_eq!(preview.monthly_fees.len(), 2);
        assert_eq!(preview.total_one_time, dec!(280));
        assert_eq!(preview.total_monthly_per_month, dec!(420));
        assert_eq!(preview.total_monthly_upfront, dec!(840));
        assert_eq!(preview.grand_total, dec!(1120));
    }

    #[test]
    fn test_no_package_outcome() {
        let fees = enrollment(true, None, vec![]);
        let outcome = FeePreviewEngine::preview(&fees);

        assert_eq!(
            outcome,
            PreviewOutcome::NoPackage {
                enrollment_id: fees.enrollment_id
            }
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_package");
    }

    #[test]
    fn test_ready_outcome_serializes_with_status() {
        let tuition = fee_item("Tuition", dec!(300), ChargeType::Monthly, false);
        let fees = enrollment(true, Some(package(vec![single(tuition)], None)), vec![]);

        let json = serde_json::to_value(FeePreviewEngine::preview(&fees)).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["grand_total"], "300");
        assert_eq!(json["monthly_fees"][0]["charge_type"], "monthly");
    }
}
