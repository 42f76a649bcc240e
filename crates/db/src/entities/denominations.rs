//! `SeaORM` Entity for the denominations table.
//!
//! Static reference data: one row per note or coin, with its face value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "denominations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub value: Decimal,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_transaction_lines::Entity")]
    CashTransactionLines,
    #[sea_orm(has_many = "super::cash_adjustment_lines::Entity")]
    CashAdjustmentLines,
}

impl Related<super::cash_transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashTransactionLines.def()
    }
}

impl Related<super::cash_adjustment_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAdjustmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
