//! Database seeder for Tadika development and testing.
//!
//! Seeds a demo academic year with a fee catalog, two packages, a class and a
//! handful of enrolled students with generated bills, then prints an admin
//! token signed with the configured secret.
//!
//! Usage: cargo run --bin seeder (after `migrator up`)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tadika_core::catalog::{BillingPeriod, ChargeType, FeeItem, FeePackage, NewPackageLine};
use tadika_db::{
    BillingRepository, CatalogRepository, EnrollmentRepository, SchoolRepository,
    repositories::{
        CreateAcademicYearInput, CreateClassInput, CreateEnrollmentInput, CreateFeeItemInput,
        CreateFeePackageInput, CreateStudentInput,
    },
};
use tadika_shared::{ADMIN_ROLE, AppConfig, JwtService};
use uuid::Uuid;

/// Name of the seeded academic year; its presence marks the database as seeded.
const DEMO_YEAR: &str = "Demo 2026";

/// Subject of the printed development token.
const DEV_ADMIN_ID: &str = "00000000-0000-0000-0000-00000000ad01";

/// (full name, guardian, returning student)
const STUDENTS: [(&str, &str, bool); 4] = [
    ("Aisyah binti Rahman", "Rahman bin Ali", false),
    ("Tan Mei Ling", "Tan Kok Wai", true),
    ("Arjun a/l Suresh", "Suresh a/l Kumar", true),
    ("Nur Iman", "Siti Aminah", false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = tadika_db::connect(&config.database).await?;

    let school = SchoolRepository::new(db.clone());
    let years = school.list_academic_years().await?;
    if let Some(year) = years.iter().find(|y| y.name == DEMO_YEAR) {
        println!("  Demo year already exists ({}), skipping data...", year.id);
    } else {
        seed_demo_year(&db, config.billing.academic_months).await?;
    }

    let admin_id = Uuid::parse_str(DEV_ADMIN_ID)?;
    let token = JwtService::new(&config.jwt).generate_access_token(admin_id, ADMIN_ROLE)?;
    println!();
    println!("Development admin token (valid {}s):", config.jwt.access_token_expiry_secs);
    println!("{token}");

    println!("Seeding complete!");
    Ok(())
}

async fn seed_demo_year(
    db: &DatabaseConnection,
    academic_months: u32,
) -> anyhow::Result<()> {
    let school = SchoolRepository::new(db.clone());

    println!("Seeding academic year...");
    let year = school
        .create_academic_year(CreateAcademicYearInput {
            name: DEMO_YEAR.to_string(),
            starts_on: date(2026, 1, 5)?,
            ends_on: date(2026, 11, 20)?,
            is_current: true,
        })
        .await?;
    println!("  Created academic year: {}", year.name);

    println!("Seeding fee catalog...");
    let items = seed_fee_items(db).await?;

    println!("Seeding fee packages...");
    let packages = seed_packages(db, year.id, &items, academic_months).await?;

    println!("Seeding class...");
    let class = school
        .create_class(CreateClassInput {
            academic_year_id: year.id,
            name: "Melati".to_string(),
            level: "K5".to_string(),
            building: Some("Blok A".to_string()),
            capacity: 25,
        })
        .await?;
    println!("  Created class: {} (capacity {})", class.name, class.capacity);

    println!("Seeding students and enrollments...");
    let enrollments = EnrollmentRepository::new(db.clone());
    let billing = BillingRepository::new(db.clone());
    for (index, (name, guardian, returning)) in STUDENTS.into_iter().enumerate() {
        let student = school
            .create_student(CreateStudentInput {
                full_name: name.to_string(),
                date_of_birth: date(2021, 3, 1).ok(),
                guardian_name: guardian.to_string(),
                guardian_phone: Some(format!("012-555 01{index:02}")),
            })
            .await?;

        let package = &packages[index % packages.len()];
        let enrollment = enrollments
            .create(CreateEnrollmentInput {
                student_id: student.id,
                academic_year_id: year.id,
                level: package.level.clone(),
                program_type: package.program_type.clone(),
                is_new_student: !returning,
                class_id: Some(class.id),
                fee_package_id: Some(package.id.into_inner()),
            })
            .await?;

        let summary = billing.generate(enrollment.id, academic_months).await?;
        println!(
            "  Enrolled {name} on {} ({} one-time, {} monthly bills)",
            package.name, summary.misc_fees_created, summary.monthly_fees_created
        );
    }

    Ok(())
}

async fn seed_fee_items(db: &DatabaseConnection) -> anyhow::Result<Vec<FeeItem>> {
    let catalog = CatalogRepository::new(db.clone());

    let specs = [
        ("Registration", "REG", 25_000, ChargeType::OneTime, true),
        ("Activity Kit", "KIT", 18_000, ChargeType::OneTime, false),
        ("Insurance", "INS", 3_500, ChargeType::OneTime, false),
        ("Tuition (Full Day)", "TUI-FD", 45_000, ChargeType::Monthly, false),
        ("Tuition (Half Day)", "TUI-HD", 28_000, ChargeType::Monthly, false),
        ("Meals", "MEAL", 9_000, ChargeType::Monthly, false),
    ];

    let mut items = Vec::with_capacity(specs.len());
    for (name, code, cents, charge_type, waivable) in specs {
        let item = catalog
            .create_fee_item(CreateFeeItemInput {
                name: name.to_string(),
                code: code.to_string(),
                default_amount: Decimal::new(cents, 2),
                charge_type,
                is_waivable_for_returning_students: waivable,
            })
            .await?;
        println!("  Created fee item: {} ({})", item.name, item.default_amount);
        items.push(item);
    }

    Ok(items)
}

async fn seed_packages(
    db: &DatabaseConnection,
    year_id: Uuid,
    items: &[FeeItem],
    academic_months: u32,
) -> anyhow::Result<Vec<FeePackage>> {
    let catalog = CatalogRepository::new(db.clone());
    let line = |code: &str, quantity: u32| -> anyhow::Result<NewPackageLine> {
        let item = items
            .iter()
            .find(|i| i.code == code)
            .ok_or_else(|| anyhow::anyhow!("fee item {code} was not seeded"))?;
        Ok(NewPackageLine {
            fee_item_id: item.id,
            quantity,
            unit_amount: None,
        })
    };

    let full_day = catalog
        .create_package(
            CreateFeePackageInput {
                name: "K5 Full Day".to_string(),
                level: "K5".to_string(),
                program_type: "full_day".to_string(),
                billing_period: BillingPeriod::Monthly,
                academic_year_id: year_id,
                upfront_months: Some(2),
                lines: vec![
                    line("REG", 1)?,
                    line("KIT", 1)?,
                    line("INS", 1)?,
                    line("TUI-FD", 1)?,
                    line("MEAL", 1)?,
                ],
            },
            academic_months,
        )
        .await?;
    println!("  Created package: {}", full_day.name);

    let half_day = catalog
        .create_package(
            CreateFeePackageInput {
                name: "K5 Half Day".to_string(),
                level: "K5".to_string(),
                program_type: "half_day".to_string(),
                billing_period: BillingPeriod::Monthly,
                academic_year_id: year_id,
                upfront_months: None,
                lines: vec![line("REG", 1)?, line("KIT", 1)?, line("TUI-HD", 1)?],
            },
            academic_months,
        )
        .await?;
    println!("  Created package: {}", half_day.name);

    Ok(vec![full_day, half_day])
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid date {year}-{month}-{day}"))
}
