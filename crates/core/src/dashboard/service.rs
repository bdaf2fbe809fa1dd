//! Enrollment balance aggregation.

use rust_decimal::Decimal;
use tadika_shared::types::AcademicYearId;

use super::types::{BalanceSummary, DashboardTotals, EnrollmentBalance, PaymentDashboard};
use crate::payments::{InstanceBalance, PaymentStatus};

/// Dashboard service for balance aggregation.
pub struct DashboardService;

impl DashboardService {
    /// Summarize all instances of an enrollment.
    ///
    /// Overall status: nothing generated is `Unpaid`; any unpaid instance
    /// makes it `Unpaid`, or `Partial` once anything was paid; fully covered
    /// totals are `Paid`; everything else is `Partial`.
    #[must_use]
    pub fn summarize(instances: &[InstanceBalance]) -> BalanceSummary {
        let total_due: Decimal = instances.iter().map(|i| i.amount_due).sum();
        let total_paid: Decimal = instances.iter().map(|i| i.amount_paid).sum();
        let total_outstanding = (total_due - total_paid).max(Decimal::ZERO);

        let any_unpaid = instances
            .iter()
            .any(|i| i.status() == PaymentStatus::Unpaid);

        let status = if instances.is_empty() {
            PaymentStatus::Unpaid
        } else if any_unpaid {
            if total_paid > Decimal::ZERO {
                PaymentStatus::Partial
            } else {
                PaymentStatus::Unpaid
            }
        } else if total_paid >= total_due {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        };

        BalanceSummary {
            total_due,
            total_paid,
            total_outstanding,
            status,
            instance_count: instances.len(),
        }
    }

    /// Assemble the dashboard for a year from per-enrollment rows.
    #[must_use]
    pub fn build(
        academic_year_id: AcademicYearId,
        enrollments: Vec<EnrollmentBalance>,
    ) -> PaymentDashboard {
        let mut totals = DashboardTotals::default();

        for row in &enrollments {
            totals.total_due += row.summary.total_due;
            totals.total_paid += row.summary.total_paid;
            totals.total_outstanding += row.summary.total_outstanding;
            match row.summary.status {
                PaymentStatus::Paid => totals.paid_count += 1,
                PaymentStatus::Partial => totals.partial_count += 1,
                PaymentStatus::Unpaid => totals.unpaid_count += 1,
            }
        }

        PaymentDashboard {
            academic_year_id,
            enrollments,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tadika_shared::types::EnrollmentId;

    #[test]
    fn test_nothing_generated_is_unpaid() {
        let summary = DashboardService::summarize(&[]);

        assert_eq!(summary.status, PaymentStatus::Unpaid);
        assert_eq!(summary.total_due, dec!(0));
        assert_eq!(summary.instance_count, 0);
    }

    #[test]
    fn test_unpaid_with_some_payment_is_partial() {
        let summary = DashboardService::summarize(&[
            InstanceBalance::new(dec!(200), dec!(200)),
            InstanceBalance::new(dec!(300), dec!(0)),
        ]);

        assert_eq!(summary.status, PaymentStatus::Partial);
        assert_eq!(summary.total_outstanding, dec!(300));
    }

    #[test]
    fn test_all_unpaid_is_unpaid() {
        let summary = DashboardService::summarize(&[
            InstanceBalance::new(dec!(200), dec!(0)),
            InstanceBalance::new(dec!(300), dec!(0)),
        ]);

        assert_eq!(summary.status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_fully_paid() {
        let summary = DashboardService::summarize(&[
            InstanceBalance::new(dec!(200), dec!(200)),
            InstanceBalance::new(dec!(300), dec!(300)),
        ]);

        assert_eq!(summary.status, PaymentStatus::Paid);
        assert_eq!(summary.total_outstanding, dec!(0));
    }

    #[test]
    fn test_partial_instance_without_unpaid_is_partial() {
        let summary = DashboardService::summarize(&[
            InstanceBalance::new(dec!(200), dec!(200)),
            InstanceBalance::new(dec!(300), dec!(100)),
        ]);

        assert_eq!(summary.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_only_waived_instances_are_paid() {
        let summary = DashboardService::summarize(&[InstanceBalance::new(dec!(0), dec!(0))]);

        assert_eq!(summary.status, PaymentStatus::Paid);
        assert_eq!(summary.instance_count, 1);
    }

    #[test]
    fn test_build_totals() {
        let row = |due, paid| EnrollmentBalance {
            enrollment_id: EnrollmentId::new(),
            student_name: "Aisyah".to_string(),
            level: "K1".to_string(),
            summary: DashboardService::summarize(&[InstanceBalance::new(due, paid)]),
        };
        let dashboard = DashboardService::build(
            AcademicYearId::new(),
            vec![row(dec!(300), dec!(300)), row(dec!(300), dec!(100)), row(dec!(300), dec!(0))],
        );

        assert_eq!(dashboard.totals.total_due, dec!(900));
        assert_eq!(dashboard.totals.total_paid, dec!(400));
        assert_eq!(dashboard.totals.total_outstanding, dec!(500));
        assert_eq!(dashboard.totals.paid_count, 1);
        assert_eq!(dashboard.totals.partial_count, 1);
        assert_eq!(dashboard.totals.unpaid_count, 1);
    }
}
