//! School records: academic years, students and classes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AcademicYears::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(AcademicYears::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AcademicYears::StartsOn).date().not_null())
                    .col(ColumnDef::new(AcademicYears::EndsOn).date().not_null())
                    .col(
                        ColumnDef::new(AcademicYears::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AcademicYears::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::FullName).string_len(200).not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(ColumnDef::new(Students::GuardianName).string_len(200).not_null())
                    .col(ColumnDef::new(Students::GuardianPhone).string_len(32).null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchoolClasses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SchoolClasses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SchoolClasses::AcademicYearId).uuid().not_null())
                    .col(ColumnDef::new(SchoolClasses::Name).string_len(100).not_null())
                    .col(ColumnDef::new(SchoolClasses::Level).string_len(32).not_null())
                    .col(ColumnDef::new(SchoolClasses::Building).string_len(100).null())
                    .col(ColumnDef::new(SchoolClasses::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(SchoolClasses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_classes_academic_year")
                            .from(SchoolClasses::Table, SchoolClasses::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_school_classes_year_name")
                    .table(SchoolClasses::Table)
                    .col(SchoolClasses::AcademicYearId)
                    .col(SchoolClasses::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SchoolClasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AcademicYears {
    Table,
    Id,
    Name,
    StartsOn,
    EndsOn,
    IsCurrent,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Students {
    Table,
    Id,
    FullName,
    DateOfBirth,
    GuardianName,
    GuardianPhone,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum SchoolClasses {
    Table,
    Id,
    AcademicYearId,
    Name,
    Level,
    Building,
    Capacity,
    CreatedAt,
}
