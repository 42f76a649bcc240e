//! `SeaORM` Entity for the cash_transactions table.
//!
//! The transaction total is never stored: it is recomputed from the
//! denomination lines on every read. Canceled rows are retained for audit
//! with the `updated_*` columns recording who canceled and why.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CashOperation, SettlementStatus, TransactionDirection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub register_id: Uuid,
    pub direction: TransactionDirection,
    pub operation: CashOperation,
    pub status: SettlementStatus,
    /// Business date of the transaction.
    pub date_of: Date,
    pub payment_ref: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    /// Reason for cancellation or correction.
    pub updated_reason: Option<String>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub updated_by: Option<Uuid>,
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
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::cash_transaction_lines::Entity")]
    CashTransactionLines,
}

impl Related<super::cash_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAccounts.def()
    }
}

impl Related<super::cash_transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashTransactionLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
