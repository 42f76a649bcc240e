//! `SeaORM` Entity for the cash_adjustments table.
//!
//! An adjustment is a physical cash count: opening float, end-of-period
//! balancing, or a supervisor's forced balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AdjustmentKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub register_id: Uuid,
    pub kind: AdjustmentKind,
    pub performed_by: Uuid,
    pub date_of: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_accounts::Entity",
        from = "Column::RegisterId",
        to = "super::cash_accounts::Column::Id"
    )]
    CashAccounts,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PerformedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::cash_adjustment_lines::Entity")]
    CashAdjustmentLines,
}

impl Related<super::cash_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAccounts.def()
    }
}

impl Related<super::cash_adjustment_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAdjustmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
