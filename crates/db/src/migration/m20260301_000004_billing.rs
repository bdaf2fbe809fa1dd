//! Billing instances and the payment ledger.
//!
//! The unique indexes on generated instances make bill generation safe to
//! race: a second writer fails instead of duplicating rows.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_fee_catalog::FeeItems;
use super::m20260301_000003_enrollments::Enrollments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MiscFees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MiscFees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MiscFees::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(MiscFees::FeeItemId).uuid().null())
                    .col(ColumnDef::new(MiscFees::Name).string_len(200).not_null())
                    .col(ColumnDef::new(MiscFees::AmountDue).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(MiscFees::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(MiscFees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_misc_fees_enrollment")
                            .from(MiscFees::Table, MiscFees::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_misc_fees_fee_item")
                            .from(MiscFees::Table, MiscFees::FeeItemId)
                            .to(FeeItems::Table, FeeItems::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_misc_fees_enrollment_name")
                    .table(MiscFees::Table)
                    .col(MiscFees::EnrollmentId)
                    .col(MiscFees::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyFeeInstances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyFeeInstances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyFeeInstances::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(MonthlyFeeInstances::FeeItemId).uuid().not_null())
                    .col(ColumnDef::new(MonthlyFeeInstances::Name).string_len(200).not_null())
                    .col(ColumnDef::new(MonthlyFeeInstances::Month).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyFeeInstances::AmountDue)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyFeeInstances::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(MonthlyFeeInstances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_fee_instances_enrollment")
                            .from(MonthlyFeeInstances::Table, MonthlyFeeInstances::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_fee_instances_fee_item")
                            .from(MonthlyFeeInstances::Table, MonthlyFeeInstances::FeeItemId)
                            .to(FeeItems::Table, FeeItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_monthly_fee_instances_item_month")
                    .table(MonthlyFeeInstances::Table)
                    .col(MonthlyFeeInstances::EnrollmentId)
                    .col(MonthlyFeeInstances::FeeItemId)
                    .col(MonthlyFeeInstances::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookInstances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookInstances::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BookInstances::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(BookInstances::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(BookInstances::AmountDue)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookInstances::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(BookInstances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_instances_enrollment")
                            .from(BookInstances::Table, BookInstances::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::MonthlyFeeInstanceId).uuid().null())
                    .col(ColumnDef::new(Payments::MiscFeeId).uuid().null())
                    .col(ColumnDef::new(Payments::BookInstanceId).uuid().null())
                    .col(ColumnDef::new(Payments::AmountPaid).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Payments::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::Note).string_len(500).null())
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_monthly_fee_instance")
                            .from(Payments::Table, Payments::MonthlyFeeInstanceId)
                            .to(MonthlyFeeInstances::Table, MonthlyFeeInstances::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_misc_fee")
                            .from(Payments::Table, Payments::MiscFeeId)
                            .to(MiscFees::Table, MiscFees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_book_instance")
                            .from(Payments::Table, Payments::BookInstanceId)
                            .to(BookInstances::Table, BookInstances::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_monthly_fee_instance")
                    .table(Payments::Table)
                    .col(Payments::MonthlyFeeInstanceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_misc_fee")
                    .table(Payments::Table)
                    .col(Payments::MiscFeeId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_book_instance")
                    .table(Payments::Table)
                    .col(Payments::BookInstanceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookInstances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyFeeInstances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MiscFees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MiscFees {
    Table,
    Id,
    EnrollmentId,
    FeeItemId,
    Name,
    AmountDue,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MonthlyFeeInstances {
    Table,
    Id,
    EnrollmentId,
    FeeItemId,
    Name,
    Month,
    AmountDue,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BookInstances {
    Table,
    Id,
    EnrollmentId,
    Title,
    AmountDue,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    MonthlyFeeInstanceId,
    MiscFeeId,
    BookInstanceId,
    AmountPaid,
    Method,
    Note,
    PaidAt,
}
