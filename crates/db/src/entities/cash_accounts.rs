//! `SeaORM` Entity for the cash_accounts table.
//!
//! A cash account is one register, owned by an area and held by a user.
//! The theoretical balance is never stored; it is derived from COMPLETED
//! transactions at read time. `balancing_amount` records the last physical
//! count.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashAccountState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub area_id: Uuid,
    pub user_id: Uuid,
    /// Opening float.
    pub amount_init: Decimal,
    /// Amount counted during the last reconciliation.
    pub balancing_amount: Decimal,
    pub state: CashAccountState,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::areas::Entity",
        from = "Column::AreaId",
        to = "super::areas::Column::Id"
    )]
    Areas,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::cash_transactions::Entity")]
    CashTransactions,
    #[sea_orm(has_many = "super::cash_adjustments::Entity")]
    CashAdjustments,
}

impl Related<super::areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Areas.def()
    }
}

impl Related<super::cash_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashTransactions.def()
    }
}

impl Related<super::cash_adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAdjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
