//! Fee catalog: fee items, packages and package items.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_school_records::AcademicYears;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeeItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FeeItems::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(FeeItems::Code)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FeeItems::DefaultAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeItems::ChargeType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(FeeItems::IsWaivableForReturningStudents)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FeeItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FeeItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeePackages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeePackages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FeePackages::Name).string_len(200).not_null())
                    .col(ColumnDef::new(FeePackages::Level).string_len(32).not_null())
                    .col(ColumnDef::new(FeePackages::ProgramType).string_len(32).not_null())
                    .col(ColumnDef::new(FeePackages::BillingPeriod).string_len(16).not_null())
                    .col(ColumnDef::new(FeePackages::AcademicYearId).uuid().not_null())
                    .col(
                        ColumnDef::new(FeePackages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeePackages::UpfrontMonths).integer().null())
                    .col(
                        ColumnDef::new(FeePackages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_packages_academic_year")
                            .from(FeePackages::Table, FeePackages::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_fee_packages_offering")
                    .table(FeePackages::Table)
                    .col(FeePackages::Level)
                    .col(FeePackages::ProgramType)
                    .col(FeePackages::BillingPeriod)
                    .col(FeePackages::AcademicYearId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeePackageItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePackageItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeePackageItems::FeePackageId).uuid().not_null())
                    .col(ColumnDef::new(FeePackageItems::FeeItemId).uuid().not_null())
                    .col(ColumnDef::new(FeePackageItems::Position).integer().not_null())
                    .col(ColumnDef::new(FeePackageItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(FeePackageItems::UnitAmount)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_package_items_package")
                            .from(FeePackageItems::Table, FeePackageItems::FeePackageId)
                            .to(FeePackages::Table, FeePackages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_package_items_fee_item")
                            .from(FeePackageItems::Table, FeePackageItems::FeeItemId)
                            .to(FeeItems::Table, FeeItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_fee_package_items_package_item")
                    .table(FeePackageItems::Table)
                    .col(FeePackageItems::FeePackageId)
                    .col(FeePackageItems::FeeItemId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeePackageItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeePackages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FeeItems {
    Table,
    Id,
    Name,
    Code,
    DefaultAmount,
    ChargeType,
    IsWaivableForReturningStudents,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum FeePackages {
    Table,
    Id,
    Name,
    Level,
    ProgramType,
    BillingPeriod,
    AcademicYearId,
    IsActive,
    UpfrontMonths,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FeePackageItems {
    Table,
    Id,
    FeePackageId,
    FeeItemId,
    Position,
    Quantity,
    UnitAmount,
}
