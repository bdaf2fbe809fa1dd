//! Payment dashboard types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_shared::types::{AcademicYearId, EnrollmentId};

use crate::payments::PaymentStatus;

/// Totals across every instance of one enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sum of amounts due.
    pub total_due: Decimal,
    /// Sum of payments.
    pub total_paid: Decimal,
    /// `max(0, total_due - total_paid)`.
    pub total_outstanding: Decimal,
    /// Overall status.
    pub status: PaymentStatus,
    /// Number of generated instances.
    pub instance_count: usize,
}

/// Dashboard row for one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentBalance {
    /// Enrollment ID.
    pub enrollment_id: EnrollmentId,
    /// Student display name.
    pub student_name: String,
    /// Enrollment level.
    pub level: String,
    /// Totals.
    #[serde(flatten)]
    pub summary: BalanceSummary,
}

/// Year-level totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Sum of amounts due.
    pub total_due: Decimal,
    /// Sum of payments.
    pub total_paid: Decimal,
    /// Sum of outstanding balances.
    pub total_outstanding: Decimal,
    /// Enrollments fully paid.
    pub paid_count: usize,
    /// Enrollments partially paid.
    pub partial_count: usize,
    /// Enrollments with nothing paid or nothing generated.
    pub unpaid_count: usize,
}

/// Payment dashboard for one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDashboard {
    /// Academic year shown.
    pub academic_year_id: AcademicYearId,
    /// One row per enrollment.
    pub enrollments: Vec<EnrollmentBalance>,
    /// Year totals.
    pub totals: DashboardTotals,
}
