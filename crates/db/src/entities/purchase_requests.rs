//! `SeaORM` Entity for the purchase_requests table.
//!
//! A supply request raised by a storekeeper or manager; delivery posts IN
//! movements and can be invoiced by a supplier.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocumentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub area_id: Uuid,
    #[sea_orm(unique)]
    pub reference: String,
    pub status: DocumentStatus,
    pub date_of: Date,
    pub comments: Option<String>,
    pub initiated_by: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub updated_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::areas::Entity",
        from = "Column::AreaId",
        to = "super::areas::Column::Id"
    )]
    Areas,
    #[sea_orm(has_many = "super::purchase_request_lines::Entity")]
    PurchaseRequestLines,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
}

impl Related<super::areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Areas.def()
    }
}

impl Related<super::purchase_request_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequestLines.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
