//! `SeaORM` Entity for the stock_movements table.
//!
//! Append-only: rows are never updated. Cancellation inserts a second row
//! whose `reverses_id` points at the original; a UNIQUE index on that column
//! makes double reversal impossible. At most one of the three detail-line
//! back-references is set, and each is UNIQUE so a delivery can only ever
//! produce one movement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{MovementDirection, MovementOperation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub area_id: Uuid,
    pub product_id: Uuid,
    pub direction: MovementDirection,
    pub operation: MovementOperation,
    pub quantity: Decimal,
    /// Business date of the movement.
    pub date_of: Date,
    /// System timestamp of the ledger entry.
    pub created_at: DateTimeWithTimeZone,
    pub comment: Option<String>,
    pub initiated_by: Uuid,
    pub created_by: Uuid,
    /// Set on reversing entries: the movement being undone.
    pub reverses_id: Option<Uuid>,
    pub sale_line_id: Option<Uuid>,
    pub purchase_line_id: Option<Uuid>,
    pub order_line_id: Option<Uuid>,
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ReversesId",
        to = "Column::Id"
    )]
    Reverses,
    #[sea_orm(
        belongs_to = "super::sale_lines::Entity",
        from = "Column::SaleLineId",
        to = "super::sale_lines::Column::Id"
    )]
    SaleLines,
    #[sea_orm(
        belongs_to = "super::purchase_request_lines::Entity",
        from = "Column::PurchaseLineId",
        to = "super::purchase_request_lines::Column::Id"
    )]
    PurchaseRequestLines,
    #[sea_orm(
        belongs_to = "super::order_lines::Entity",
        from = "Column::OrderLineId",
        to = "super::order_lines::Column::Id"
    )]
    OrderLines,
}

impl Related<super::areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Areas.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
