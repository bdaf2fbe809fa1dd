//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with all migrations
//! applied. The pool holds a single connection so the database lives as long
//! as the pool does.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tadika_core::catalog::{BillingPeriod, ChargeType, FeeItem, FeePackage, NewPackageLine};
use tadika_db::migration::Migrator;
use tadika_db::repositories::{
    CatalogRepository, CreateAcademicYearInput, CreateEnrollmentInput, CreateFeeItemInput,
    CreateFeePackageInput, CreateStudentInput, EnrollmentRepository, SchoolRepository,
};
use tadika_shared::DatabaseConfig;
use uuid::Uuid;

/// Months per academic year used by the tests.
pub const ACADEMIC_MONTHS: u32 = 12;

/// A migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let db = tadika_db::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// A school year with a registration fee (200, one-time, waivable for
/// returning students) and tuition (300, monthly) bundled in a K1 package
/// collecting two months upfront.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub year_id: Uuid,
    pub registration: FeeItem,
    pub tuition: FeeItem,
    pub package: FeePackage,
}

pub async fn fixture() -> Fixture {
    let db = setup_db().await;

    let year = SchoolRepository::new(db.clone())
        .create_academic_year(CreateAcademicYearInput {
            name: "2026/2027".to_string(),
            starts_on: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            is_current: true,
        })
        .await
        .expect("Failed to create academic year");

    let catalog = CatalogRepository::new(db.clone());
    let registration = catalog
        .create_fee_item(CreateFeeItemInput {
            name: "Registration".to_string(),
            code: "REG".to_string(),
            default_amount: dec!(200),
            charge_type: ChargeType::OneTime,
            is_waivable_for_returning_students: true,
        })
        .await
        .expect("Failed to create registration fee");
    let tuition = catalog
        .create_fee_item(CreateFeeItemInput {
            name: "Tuition".to_string(),
            code: "TUI".to_string(),
            default_amount: dec!(300),
            charge_type: ChargeType::Monthly,
            is_waivable_for_returning_students: false,
        })
        .await
        .expect("Failed to create tuition fee");

    let package = catalog
        .create_package(
            CreateFeePackageInput {
                name: "K1 Full Day".to_string(),
                level: "K1".to_string(),
                program_type: "full_day".to_string(),
                billing_period: BillingPeriod::Monthly,
                academic_year_id: year.id,
                upfront_months: Some(2),
                lines: vec![
                    NewPackageLine {
                        fee_item_id: registration.id,
                        quantity: 1,
                        unit_amount: None,
                    },
                    NewPackageLine {
                        fee_item_id: tuition.id,
                        quantity: 1,
                        unit_amount: None,
                    },
                ],
            },
            ACADEMIC_MONTHS,
        )
        .await
        .expect("Failed to create fee package");

    Fixture {
        db,
        year_id: year.id,
        registration,
        tuition,
        package,
    }
}

impl Fixture {
    /// Registers a student and enrolls them, optionally bound to the package.
    pub async fn enroll(&self, name: &str, is_new_student: bool, with_package: bool) -> Uuid {
        let student = SchoolRepository::new(self.db.clone())
            .create_student(CreateStudentInput {
                full_name: name.to_string(),
                date_of_birth: None,
                guardian_name: format!("Guardian of {name}"),
                guardian_phone: None,
            })
            .await
            .expect("Failed to create student");

        EnrollmentRepository::new(self.db.clone())
            .create(CreateEnrollmentInput {
                student_id: student.id,
                academic_year_id: self.year_id,
                level: "K1".to_string(),
                program_type: "full_day".to_string(),
                is_new_student,
                class_id: None,
                fee_package_id: with_package.then(|| self.package.id.into_inner()),
            })
            .await
            .expect("Failed to enroll student")
            .id
    }
}
