//! `SeaORM` Entity for payments table.
//!
//! Exactly one of the three instance columns is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub monthly_fee_instance_id: Option<Uuid>,
    pub misc_fee_id: Option<Uuid>,
    pub book_instance_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_paid: Decimal,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub paid_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monthly_fee_instances::Entity",
        from = "Column::MonthlyFeeInstanceId",
        to = "super::monthly_fee_instances::Column::Id"
    )]
    MonthlyFeeInstances,
    #[sea_orm(
        belongs_to = "super::misc_fees::Entity",
        from = "Column::MiscFeeId",
        to = "super::misc_fees::Column::Id"
    )]
    MiscFees,
    #[sea_orm(
        belongs_to = "super::book_instances::Entity",
        from = "Column::BookInstanceId",
        to = "super::book_instances::Column::Id"
    )]
    BookInstances,
}

impl Related<super::monthly_fee_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyFeeInstances.def()
    }
}

impl Related<super::misc_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MiscFees.def()
    }
}

impl Related<super::book_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookInstances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
