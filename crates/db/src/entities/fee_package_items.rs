//! `SeaORM` Entity for fee_package_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_package_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fee_package_id: Uuid,
    pub fee_item_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub unit_amount: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_packages::Entity",
        from = "Column::FeePackageId",
        to = "super::fee_packages::Column::Id"
    )]
    FeePackages,
    #[sea_orm(
        belongs_to = "super::fee_items::Entity",
        from = "Column::FeeItemId",
        to = "super::fee_items::Column::Id"
    )]
    FeeItems,
}

impl Related<super::fee_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePackages.def()
    }
}

impl Related<super::fee_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
