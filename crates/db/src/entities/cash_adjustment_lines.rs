//! `SeaORM` Entity for the cash_adjustment_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_adjustment_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub adjustment_id: Uuid,
    pub denomination_id: Uuid,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_adjustments::Entity",
        from = "Column::AdjustmentId",
        to = "super::cash_adjustments::Column::Id"
    )]
    CashAdjustments,
    #[sea_orm(
        belongs_to = "super::denominations::Entity",
        from = "Column::DenominationId",
        to = "super::denominations::Column::Id"
    )]
    Denominations,
}

impl Related<super::cash_adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAdjustments.def()
    }
}

impl Related<super::denominations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Denominations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
