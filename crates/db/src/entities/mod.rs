//! `SeaORM` entity definitions.

pub mod academic_years;
pub mod book_instances;
pub mod enrollment_fee_adjustments;
pub mod enrollments;
pub mod fee_items;
pub mod fee_package_items;
pub mod fee_packages;
pub mod misc_fees;
pub mod monthly_fee_instances;
pub mod payments;
pub mod school_classes;
pub mod sea_orm_active_enums;
pub mod students;
