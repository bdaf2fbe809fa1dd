//! Enrollments and per-enrollment fee adjustments.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_school_records::{AcademicYears, SchoolClasses, Students};
use super::m20260301_000002_fee_catalog::{FeeItems, FeePackages};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrollments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::AcademicYearId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::ClassId).uuid().null())
                    .col(ColumnDef::new(Enrollments::FeePackageId).uuid().null())
                    .col(ColumnDef::new(Enrollments::Level).string_len(32).not_null())
                    .col(ColumnDef::new(Enrollments::ProgramType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Enrollments::IsNewStudent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_academic_year")
                            .from(Enrollments::Table, Enrollments::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_class")
                            .from(Enrollments::Table, Enrollments::ClassId)
                            .to(SchoolClasses::Table, SchoolClasses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_fee_package")
                            .from(Enrollments::Table, Enrollments::FeePackageId)
                            .to(FeePackages::Table, FeePackages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_enrollments_student_year")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::AcademicYearId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnrollmentFeeAdjustments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::EnrollmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::FeeItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnrollmentFeeAdjustments::Quantity).integer().null())
                    .col(ColumnDef::new(EnrollmentFeeAdjustments::Reason).string_len(500).null())
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentFeeAdjustments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_fee_adjustments_enrollment")
                            .from(
                                EnrollmentFeeAdjustments::Table,
                                EnrollmentFeeAdjustments::EnrollmentId,
                            )
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_fee_adjustments_fee_item")
                            .from(
                                EnrollmentFeeAdjustments::Table,
                                EnrollmentFeeAdjustments::FeeItemId,
                            )
                            .to(FeeItems::Table, FeeItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_enrollment_fee_adjustments_item")
                    .table(EnrollmentFeeAdjustments::Table)
                    .col(EnrollmentFeeAdjustments::EnrollmentId)
                    .col(EnrollmentFeeAdjustments::FeeItemId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EnrollmentFeeAdjustments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Enrollments {
    Table,
    Id,
    StudentId,
    AcademicYearId,
    ClassId,
    FeePackageId,
    Level,
    ProgramType,
    IsNewStudent,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrollmentFeeAdjustments {
    Table,
    Id,
    EnrollmentId,
    FeeItemId,
    Amount,
    Quantity,
    Reason,
    CreatedAt,
    UpdatedAt,
}
