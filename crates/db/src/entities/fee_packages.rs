//! `SeaORM` Entity for fee_packages table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BillingPeriod;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub level: String,
    pub program_type: String,
    pub billing_period: BillingPeriod,
    pub academic_year_id: Uuid,
    pub is_active: bool,
    /// Collection rule; `None` means one month upfront.
    pub upfront_months: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_package_items::Entity")]
    FeePackageItems,
    #[sea_orm(
        belongs_to = "super::academic_years::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_years::Column::Id"
    )]
    AcademicYears,
}

impl Related<super::fee_package_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePackageItems.def()
    }
}

impl Related<super::academic_years::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYears.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
