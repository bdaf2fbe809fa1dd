//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder so they run on both PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_school_records;
mod m20260301_000002_fee_catalog;
mod m20260301_000003_enrollments;
mod m20260301_000004_billing;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_school_records::Migration),
            Box::new(m20260301_000002_fee_catalog::Migration),
            Box::new(m20260301_000003_enrollments::Migration),
            Box::new(m20260301_000004_billing::Migration),
        ]
    }
}
