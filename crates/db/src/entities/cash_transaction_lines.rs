//! `SeaORM` Entity for the cash_transaction_lines table.
//!
//! One row per denomination: quantity x face value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_transaction_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub denomination_id: Uuid,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_transactions::Entity",
        from = "Column::TransactionId",
        to = "super::cash_transactions::Column::Id"
    )]
    CashTransactions,
    #[sea_orm(
        belongs_to = "super::denominations::Entity",
        from = "Column::DenominationId",
        to = "super::denominations::Column::Id"
    )]
    Denominations,
}

impl Related<super::cash_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashTransactions.def()
    }
}

impl Related<super::denominations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Denominations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
