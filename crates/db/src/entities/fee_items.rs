//! `SeaORM` Entity for fee_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ChargeType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub default_amount: Decimal,
    pub charge_type: ChargeType,
    pub is_waivable_for_returning_students: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_package_items::Entity")]
    FeePackageItems,
}

impl Related<super::fee_package_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePackageItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
