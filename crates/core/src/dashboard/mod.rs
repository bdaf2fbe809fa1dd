//! Payment dashboard: per-enrollment balances for an academic year.

pub mod cache;
pub mod service;
pub mod types;

pub use cache::DashboardCache;
pub use service::DashboardService;
pub use types::{BalanceSummary, DashboardTotals, EnrollmentBalance, PaymentDashboard};
