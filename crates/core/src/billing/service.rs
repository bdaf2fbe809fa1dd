//! Billing plan computation.

use std::collections::HashSet;

use super::error::BillingError;
use super::types::{BillingPlan, ExistingInstances, PlannedMiscFee, PlannedMonthlyFee};
use crate::fees::PreviewOutcome;
use crate::payments::PaymentStatus;

/// Billing service for instance generation.
pub struct BillingService;

impl BillingService {
    /// Plan the rows missing for an enrollment.
    ///
    /// One misc fee per one-time line (keyed by name) and one monthly
    /// instance per monthly line and month `1..=academic_months` (keyed by
    /// fee item and month). Zero-cost rows start out `Paid`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::FeePackageRequired` when no package is bound and
    /// `BillingError::NoAcademicMonths` when `academic_months` is zero.
    pub fn plan(
        outcome: &PreviewOutcome,
        existing: &ExistingInstances,
        academic_months: u32,
    ) -> Result<BillingPlan, BillingError> {
        let preview = outcome.preview().ok_or(BillingError::FeePackageRequired)?;

        if academic_months == 0 {
            return Err(BillingError::NoAcademicMonths);
        }

        let mut plan = BillingPlan::default();

        let mut names: HashSet<&str> = existing.misc_fee_names.iter().map(String::as_str).collect();
        for line in &preview.one_time_fees {
            if !names.insert(line.name.as_str()) {
                continue;
            }
            plan.misc_fees.push(PlannedMiscFee {
                fee_item_id: line.fee_item_id,
                name: line.name.clone(),
                amount_due: line.final_cost,
                status: PaymentStatus::initial(line.final_cost),
            });
        }

        for line in &preview.monthly_fees {
            for month in 1..=academic_months {
                if existing.monthly.contains(&(line.fee_item_id, month)) {
                    continue;
                }
                plan.monthly_fees.push(PlannedMonthlyFee {
                    fee_item_id: line.fee_item_id,
                    name: line.name.clone(),
                    month,
                    amount_due: line.final_cost,
                    status: PaymentStatus::initial(line.final_cost),
                });
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        BillingPeriod, ChargeType, CollectionRule, FeeItem, FeePackage, FeePackageItem,
    };
    use crate::fees::{EnrollmentFees, FeePreviewEngine};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tadika_shared::types::{AcademicYearId, EnrollmentId, FeeItemId, FeePackageId};

    fn item(name: &str, amount: Decimal, charge_type: ChargeType, waivable: bool) -> FeePackageItem {
        FeePackageItem {
            fee_item: FeeItem {
                id: FeeItemId::new(),
                name: name.to_string(),
                code: name.to_uppercase(),
                default_amount: amount,
                charge_type,
                is_waivable_for_returning_students: waivable,
                is_active: true,
            },
            quantity: 1,
            unit_amount: None,
        }
    }

    fn outcome(items: Vec<FeePackageItem>, is_new_student: bool) -> PreviewOutcome {
        FeePreviewEngine::preview(&EnrollmentFees {
            enrollment_id: EnrollmentId::new(),
            is_new_student,
            package: Some(FeePackage {
                id: FeePackageId::new(),
                name: "K1".to_string(),
                level: "K1".to_string(),
                program_type: "full_day".to_string(),
                billing_period: BillingPeriod::Monthly,
                academic_year_id: AcademicYearId::new(),
                is_active: true,
                items,
                collection_rule: Some(CollectionRule { upfront_months: 2 }),
            }),
            adjustments: vec![],
        })
    }

    #[test]
    fn test_plan_full_generation() {
        let outcome = outcome(
            vec![
                item("Registration", dec!(200), ChargeType::OneTime, false),
                item("Tuition", dec!(300), ChargeType::Monthly, false),
            ],
            true,
        );

        let plan = BillingService::plan(&outcome, &ExistingInstances::default(), 12).unwrap();

        assert_eq!(plan.misc_fees.len(), 1);
        assert_eq!(plan.misc_fees[0].amount_due, dec!(200));
        assert_eq!(plan.misc_fees[0].status, PaymentStatus::Unpaid);
        assert_eq!(plan.monthly_fees.len(), 12);
        assert_eq!(
            plan.monthly_fees.iter().map(|m| m.month).collect::<Vec<_>>(),
            (1..=12).collect::<Vec<_>>()
        );
        assert_eq!(plan.len(), 13);
    }

    #[test]
    fn test_waived_line_is_generated_as_paid() {
        let outcome = outcome(
            vec![item("Registration", dec!(200), ChargeType::OneTime, true)],
            false,
        );

        let plan = BillingService::plan(&outcome, &ExistingInstances::default(), 10).unwrap();

        assert_eq!(plan.misc_fees[0].amount_due, dec!(0));
        assert_eq!(plan.misc_fees[0].status, PaymentStatus::Paid);
    }

    #[test]
    fn test_existing_rows_are_skipped() {
        let tuition = item("Tuition", dec!(300), ChargeType::Monthly, false);
        let tuition_id = tuition.fee_item.id;
        let outcome = outcome(
            vec![item("Registration", dec!(200), ChargeType::OneTime, false), tuition],
            true,
        );

        let mut existing = ExistingInstances::default();
        existing.misc_fee_names.insert("Registration".to_string());
        existing.monthly.insert((tuition_id, 1));
        existing.monthly.insert((tuition_id, 2));

        let plan = BillingService::plan(&outcome, &existing, 12).unwrap();

        assert!(plan.misc_fees.is_empty());
        assert_eq!(plan.monthly_fees.len(), 10);
        assert_eq!(plan.monthly_fees[0].month, 3);
    }

    #[test]
    fn test_fully_generated_plan_is_empty() {
        let tuition = item("Tuition", dec!(300), ChargeType::Monthly, false);
        let tuition_id = tuition.fee_item.id;
        let outcome = outcome(vec![tuition], true);

        let existing = ExistingInstances {
            misc_fee_names: HashSet::new(),
            monthly: (1..=12).map(|m| (tuition_id, m)).collect(),
        };

        assert!(BillingService::plan(&outcome, &existing, 12).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_one_time_names_planned_once() {
        let outcome = outcome(
            vec![
                item("Activity Fee", dec!(50), ChargeType::OneTime, false),
                item("Activity Fee", dec!(70), ChargeType::OneTime, false),
            ],
            true,
        );

        let plan = BillingService::plan(&outcome, &ExistingInstances::default(), 12).unwrap();
        assert_eq!(plan.misc_fees.len(), 1);
        assert_eq!(plan.misc_fees[0].amount_due, dec!(50));
    }

    #[test]
    fn test_no_package_fails() {
        let outcome = PreviewOutcome::NoPackage {
            enrollment_id: EnrollmentId::new(),
        };

        assert_eq!(
            BillingService::plan(&outcome, &ExistingInstances::default(), 12),
            Err(BillingError::FeePackageRequired)
        );
    }

    #[test]
    fn test_zero_months_fails() {
        let outcome = outcome(vec![item("Tuition", dec!(1), ChargeType::Monthly, false)], true);

        assert_eq!(
            BillingService::plan(&outcome, &ExistingInstances::default(), 0),
            Err(BillingError::NoAcademicMonths)
        );
    }
}
