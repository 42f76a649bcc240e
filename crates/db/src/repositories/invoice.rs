//! Invoice settlement repository.
//!
//! Accumulates partial payments against purchase/order-derived invoices and
//! gates status transitions on payment completeness. `amount_to_pay` is
//! derived from freshly-loaded lines inside the same transaction as every
//! guarded write, with the invoice row locked, so the gate can never race
//! a delivery confirmation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tsena_core::invoice::{self, InvoiceError, InvoiceLineAmounts, InvoiceStatus, InvoiceType};
use tsena_shared::AppError;
use tsena_shared::types::{EmployeeId, InvoiceId, OrderId, PurchaseId, UserId};

use crate::entities::{
    invoice_lines, invoices, order_lines, orders, purchase_request_lines, purchase_requests,
};
use crate::retry::{self, TransientError, with_retry};

/// Error types for invoice settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// A settlement rule was violated; nothing was written.
    #[error(transparent)]
    Rule(#[from] InvoiceError),

    /// Purchase request not found.
    #[error("Purchase request not found: {0}")]
    PurchaseNotFound(Uuid),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransientError for SettlementError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(err) if retry::is_transient_db_err(err))
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Rule(rule) => match rule {
                InvoiceError::NonPositiveAmount => Self::Validation(rule.to_string()),
                InvoiceError::InvoiceNotFound(_) => Self::NotFound(rule.to_string()),
                InvoiceError::OverpaymentRejected { .. }
                | InvoiceError::UnderpaidClosure { .. }
                | InvoiceError::RejectedWithPayment { .. } => Self::BusinessRule(rule.to_string()),
                InvoiceError::PaymentsClosed(_) => Self::StaleState(rule.to_string()),
            },
            SettlementError::PurchaseNotFound(_) | SettlementError::OrderNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SettlementError::Database(db) if retry::is_transient_db_err(&db) => {
                Self::Transient(db.to_string())
            }
            SettlementError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// An invoice with its detail lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Detail lines.
    pub lines: Vec<invoice_lines::Model>,
}

/// Derived settlement amounts of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceAmounts {
    /// Total requested value.
    pub total_amount: Decimal,
    /// Amount owed (confirmed lines only).
    pub amount_to_pay: Decimal,
    /// Amount paid so far.
    pub amount_payed: Decimal,
}

/// Invoice settlement repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    retry_attempts: u32,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retry_attempts: retry::DEFAULT_ATTEMPTS,
        }
    }

    /// Overrides the number of attempts for conflicting transactions.
    #[must_use]
    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Raises an incoming invoice from a purchase request.
    ///
    /// Lines are copied with their requested quantities and unit prices;
    /// `quantity_real` stays unset until delivery confirms it.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseNotFound` or a database error.
    pub async fn create_for_purchase(
        &self,
        purchase_id: PurchaseId,
        reference: Option<String>,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<InvoiceWithLines, SettlementError> {
        let purchase_id = purchase_id.into_inner();
        let txn = self.db.begin().await?;

        let purchase = purchase_requests::Entity::find_by_id(purchase_id)
            .one(&txn)
            .await?
            .ok_or(SettlementError::PurchaseNotFound(purchase_id))?;
        let document_lines = purchase_request_lines::Entity::find()
            .filter(purchase_request_lines::Column::PurchaseId.eq(purchase_id))
            .all(&txn)
            .await?;

        let header = new_invoice_header(
            purchase.area_id,
            reference,
            InvoiceType::In,
            Some(purchase_id),
            None,
            initiated_by,
            created_by,
        );
        let invoice = header.insert(&txn).await?;

        let mut lines = Vec::with_capacity(document_lines.len());
        for line in document_lines {
            let inserted = invoice_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice.id),
                product_id: Set(line.product_id),
                quantity_requested: Set(line.quantity_requested),
                quantity_real: Set(None),
                unit_price: Set(line.unit_price),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        txn.commit().await?;
        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Raises an outgoing invoice from a customer order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` or a database error.
    pub async fn create_for_order(
        &self,
        order_id: OrderId,
        reference: Option<String>,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<InvoiceWithLines, SettlementError> {
        let order_id = order_id.into_inner();
        let txn = self.db.begin().await?;

        let order = orders::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or(SettlementError::OrderNotFound(order_id))?;
        let document_lines = order_lines::Entity::find()
            .filter(order_lines::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;

        let header = new_invoice_header(
            order.area_id,
            reference,
            InvoiceType::Out,
            None,
            Some(order_id),
            initiated_by,
            created_by,
        );
        let invoice = header.insert(&txn).await?;

        let mut lines = Vec::with_capacity(document_lines.len());
        for line in document_lines {
            let inserted = invoice_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice.id),
                product_id: Set(line.product_id),
                quantity_requested: Set(line.quantity_requested),
                quantity_real: Set(None),
                unit_price: Set(line.unit_price),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        txn.commit().await?;
        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Records a partial payment.
    ///
    /// Locks the invoice, derives the amount owed from the live lines, and
    /// rejects overpayments with no state change. Never touches the status.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound`, `NonPositiveAmount`, `PaymentsClosed`,
    /// `OverpaymentRejected`, or a database error.
    pub async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        amount: Decimal,
    ) -> Result<invoices::Model, SettlementError> {
        let id = invoice_id.into_inner();
        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let invoice = invoices::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(InvoiceError::InvoiceNotFound(id))?;
            let amounts = load_line_amounts(&txn, id).await?;

            let new_amount_payed = invoice::apply_payment(
                invoice.status.into(),
                invoice.amount_payed,
                invoice::amount_to_pay(&amounts),
                amount,
            )?;

            let mut active: invoices::ActiveModel = invoice.into();
            active.amount_payed = Set(new_amount_payed);
            active.updated_at = Set(Some(Utc::now().into()));
            let updated = active.update(&txn).await?;

            txn.commit().await?;
            Ok(updated)
        })
        .await
    }

    /// Applies an explicit status transition.
    ///
    /// CLOSED requires full payment and REJECTED requires that nothing was
    /// paid; both checks read the live lines inside the same transaction as
    /// the status write.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound`, `UnderpaidClosure`, `RejectedWithPayment`,
    /// or a database error.
    pub async fn transition_status(
        &self,
        invoice_id: InvoiceId,
        new_status: InvoiceStatus,
        updated_by: UserId,
    ) -> Result<invoices::Model, SettlementError> {
        let id = invoice_id.into_inner();
        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let invoice = invoices::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(InvoiceError::InvoiceNotFound(id))?;
            let amounts = load_line_amounts(&txn, id).await?;

            invoice::check_status_transition(
                new_status,
                invoice.amount_payed,
                invoice::amount_to_pay(&amounts),
            )?;

            let mut active: invoices::ActiveModel = invoice.into();
            active.status = Set(new_status.into());
            active.updated_at = Set(Some(Utc::now().into()));
            active.updated_by = Set(Some(updated_by.into_inner()));
            let updated = active.update(&txn).await?;

            txn.commit().await?;
            Ok(updated)
        })
        .await
    }

    /// Derived settlement amounts for an invoice. Read-only.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` or a database error.
    pub async fn amounts(&self, invoice_id: InvoiceId) -> Result<InvoiceAmounts, SettlementError> {
        let id = invoice_id.into_inner();
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::InvoiceNotFound(id))?;
        let amounts = load_line_amounts(&self.db, id).await?;

        Ok(InvoiceAmounts {
            total_amount: invoice::total_amount(&amounts),
            amount_to_pay: invoice::amount_to_pay(&amounts),
            amount_payed: invoice.amount_payed,
        })
    }
}

/// Builds the active model for a new invoice header.
fn new_invoice_header(
    area_id: Uuid,
    reference: Option<String>,
    invoice_type: InvoiceType,
    purchase_id: Option<Uuid>,
    order_id: Option<Uuid>,
    initiated_by: EmployeeId,
    created_by: UserId,
) -> invoices::ActiveModel {
    let now = Utc::now();
    invoices::ActiveModel {
        id: Set(Uuid::new_v4()),
        area_id: Set(area_id),
        reference: Set(reference),
        invoice_type: Set(invoice_type.into()),
        status: Set(InvoiceStatus::Pending.into()),
        amount_payed: Set(Decimal::ZERO),
        date_of: Set(now.date_naive()),
        comments: Set(None),
        purchase_id: Set(purchase_id),
        order_id: Set(order_id),
        initiated_by: Set(initiated_by.into_inner()),
        created_by: Set(created_by.into_inner()),
        created_at: Set(now.into()),
        updated_at: Set(None),
        updated_by: Set(None),
    }
}

/// Loads the line amounts of an invoice for derived-total computation.
pub(crate) async fn load_line_amounts<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
) -> Result<Vec<InvoiceLineAmounts>, DbErr> {
    let lines = invoice_lines::Entity::find()
        .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
        .all(conn)
        .await?;

    Ok(lines
        .into_iter()
        .map(|line| InvoiceLineAmounts {
            quantity_requested: line.quantity_requested,
            quantity_real: line.quantity_real,
            unit_price: line.unit_price,
        })
        .collect())
}
