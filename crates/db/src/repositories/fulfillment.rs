//! Delivery orchestration: the seam between documents, the stock ledger, and
//! invoice settlement.
//!
//! Confirming a detail line's delivered/received quantity posts the matching
//! stock movement (IN for purchase receipt, OUT for sale/order delivery) in
//! the same transaction, exactly once per line: the movement stores the line
//! id as its back-reference and a UNIQUE index backstops races. When the
//! document has been invoiced, the matching invoice line's `quantity_real`
//! is confirmed in the same transaction too.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tsena_core::stock::{LinkedDetail, MovementDirection, MovementOperation, NewMovement};
use tsena_shared::AppError;
use tsena_shared::types::{
    AreaId, EmployeeId, OrderId, OrderLineId, ProductId, PurchaseId, PurchaseLineId, SaleId,
    SaleLineId, UserId,
};

use crate::entities::{
    invoice_lines, invoices, order_lines, orders, purchase_request_lines, purchase_requests,
    sale_lines, sales, stock_movements,
    sea_orm_active_enums::{DocumentStatus, SaleStatus},
};
use crate::repositories::stock::{StockLedgerError, insert_movement};
use crate::retry::{self, TransientError, with_retry};

/// Error types for fulfillment operations.
#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),

    /// Purchase request not found.
    #[error("Purchase request not found: {0}")]
    PurchaseNotFound(Uuid),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// Detail line not found.
    #[error("Detail line not found: {0}")]
    LineNotFound(Uuid),

    /// The detail line has already been delivered; a delivery fires its
    /// stock movement exactly once.
    #[error("Detail line {0} has already been delivered")]
    DetailAlreadyDelivered(Uuid),

    /// The document's status does not allow delivery.
    #[error("Document {document} is {status:?} and cannot be delivered")]
    NotDeliverable {
        /// The document.
        document: Uuid,
        /// Its current status.
        status: String,
    },

    /// Delivery quantity must be strictly positive.
    #[error("Delivery quantity must be strictly positive")]
    NonPositiveQuantity,

    /// A document needs at least one detail line.
    #[error("Document must have at least one detail line")]
    EmptyDetailLines,

    /// The stock ledger rejected the movement.
    #[error(transparent)]
    Stock(#[from] StockLedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransientError for FulfillmentError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Stock(err) => err.is_transient(),
            Self::Database(err) => retry::is_transient_db_err(err),
            _ => false,
        }
    }
}

impl From<FulfillmentError> for AppError {
    fn from(err: FulfillmentError) -> Self {
        match err {
            FulfillmentError::SaleNotFound(_)
            | FulfillmentError::PurchaseNotFound(_)
            | FulfillmentError::OrderNotFound(_)
            | FulfillmentError::LineNotFound(_) => Self::NotFound(err.to_string()),
            FulfillmentError::DetailAlreadyDelivered(_) | FulfillmentError::NotDeliverable { .. } => {
                Self::StaleState(err.to_string())
            }
            FulfillmentError::NonPositiveQuantity | FulfillmentError::EmptyDetailLines => {
                Self::Validation(err.to_string())
            }
            FulfillmentError::Stock(stock) => stock.into(),
            FulfillmentError::Database(db) if retry::is_transient_db_err(&db) => {
                Self::Transient(db.to_string())
            }
            FulfillmentError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// One line of a new sale.
#[derive(Debug, Clone, Copy)]
pub struct SaleLineInput {
    /// Product sold.
    pub product_id: ProductId,
    /// Quantity sold; must be strictly positive.
    pub quantity: Decimal,
    /// Agreed unit price.
    pub unit_price: Decimal,
}

/// Input for recording a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// The area the sale belongs to.
    pub area_id: AreaId,
    /// Unique document reference.
    pub reference: String,
    /// Detail lines; must not be empty.
    pub lines: Vec<SaleLineInput>,
    /// User recording the sale.
    pub created_by: UserId,
}

/// One line of a new purchase request or order.
#[derive(Debug, Clone, Copy)]
pub struct DocumentLineInput {
    /// Product requested.
    pub product_id: ProductId,
    /// Quantity requested; must be strictly positive.
    pub quantity_requested: Decimal,
    /// Agreed unit price.
    pub unit_price: Decimal,
}

/// Input for raising a purchase request.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// The area the request belongs to.
    pub area_id: AreaId,
    /// Unique document reference.
    pub reference: String,
    /// Optional free-text comments.
    pub comments: Option<String>,
    /// Detail lines; must not be empty.
    pub lines: Vec<DocumentLineInput>,
    /// Employee who requested the supply.
    pub initiated_by: EmployeeId,
    /// User recording the request.
    pub created_by: UserId,
}

/// Input for recording a customer order.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    /// The area the order belongs to.
    pub area_id: AreaId,
    /// Unique document reference.
    pub reference: String,
    /// Optional free-text comments.
    pub comments: Option<String>,
    /// Detail lines; must not be empty.
    pub lines: Vec<DocumentLineInput>,
    /// User recording the order.
    pub created_by: UserId,
}

/// Fulfillment repository: document creation and delivery triggers.
#[derive(Debug, Clone)]
pub struct FulfillmentRepository {
    db: DatabaseConnection,
    retry_attempts: u32,
}

impl FulfillmentRepository {
    /// Creates a new fulfillment repository.
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

    /// Records a sale with its detail lines. No stock moves until delivery.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDetailLines`, `NonPositiveQuantity`, or a database
    /// error.
    pub async fn create_sale(
        &self,
        input: CreateSaleInput,
    ) -> Result<(sales::Model, Vec<sale_lines::Model>), FulfillmentError> {
        if input.lines.is_empty() {
            return Err(FulfillmentError::EmptyDetailLines);
        }
        if input.lines.iter().any(|line| line.quantity <= Decimal::ZERO) {
            return Err(FulfillmentError::NonPositiveQuantity);
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let sale = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            area_id: Set(input.area_id.into_inner()),
            reference: Set(input.reference.clone()),
            status: Set(SaleStatus::Pending),
            date_of: Set(now.date_naive()),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let inserted = sale_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale.id),
                product_id: Set(line.product_id.into_inner()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                delivered_at: Set(None),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        txn.commit().await?;
        Ok((sale, lines))
    }

    /// Raises a purchase request with its detail lines.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDetailLines`, `NonPositiveQuantity`, or a database
    /// error.
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<(purchase_requests::Model, Vec<purchase_request_lines::Model>), FulfillmentError>
    {
        if input.lines.is_empty() {
            return Err(FulfillmentError::EmptyDetailLines);
        }
        if input
            .lines
            .iter()
            .any(|line| line.quantity_requested <= Decimal::ZERO)
        {
            return Err(FulfillmentError::NonPositiveQuantity);
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let purchase = purchase_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            area_id: Set(input.area_id.into_inner()),
            reference: Set(input.reference.clone()),
            status: Set(DocumentStatus::Opened),
            date_of: Set(now.date_naive()),
            comments: Set(input.comments.clone()),
            initiated_by: Set(input.initiated_by.into_inner()),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let inserted = purchase_request_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(purchase.id),
                product_id: Set(line.product_id.into_inner()),
                quantity_requested: Set(line.quantity_requested),
                quantity_accorded: Set(None),
                unit_price: Set(line.unit_price),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        txn.commit().await?;
        Ok((purchase, lines))
    }

    /// Records a customer order with its detail lines.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDetailLines`, `NonPositiveQuantity`, or a database
    /// error.
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<(orders::Model, Vec<order_lines::Model>), FulfillmentError> {
        if input.lines.is_empty() {
            return Err(FulfillmentError::EmptyDetailLines);
        }
        if input
            .lines
            .iter()
            .any(|line| line.quantity_requested <= Decimal::ZERO)
        {
            return Err(FulfillmentError::NonPositiveQuantity);
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let order = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            area_id: Set(input.area_id.into_inner()),
            reference: Set(input.reference.clone()),
            status: Set(DocumentStatus::Opened),
            date_of: Set(now.date_naive()),
            comments: Set(input.comments.clone()),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let inserted = order_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id.into_inner()),
                quantity_requested: Set(line.quantity_requested),
                quantity_accorded: Set(None),
                unit_price: Set(line.unit_price),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        txn.commit().await?;
        Ok((order, lines))
    }

    /// Confirms receipt of one purchase line.
    ///
    /// One transaction: sets `quantity_accorded`, posts the IN/SUPPLY
    /// movement linked to the line, and confirms `quantity_real` on the
    /// matching invoice line when the purchase has been invoiced.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound`, `DetailAlreadyDelivered`,
    /// `NonPositiveQuantity`, a stock ledger error, or a database error.
    pub async fn deliver_purchase_line(
        &self,
        line_id: PurchaseLineId,
        quantity_accorded: Decimal,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<stock_movements::Model, FulfillmentError> {
        if quantity_accorded <= Decimal::ZERO {
            return Err(FulfillmentError::NonPositiveQuantity);
        }
        let id = line_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let line = purchase_request_lines::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::LineNotFound(id))?;
            if line.quantity_accorded.is_some() {
                return Err(FulfillmentError::DetailAlreadyDelivered(id));
            }

            let purchase = purchase_requests::Entity::find_by_id(line.purchase_id)
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::PurchaseNotFound(line.purchase_id))?;

            let movement = deliver_line_in_txn(
                &txn,
                DeliveredLine {
                    area_id: purchase.area_id,
                    product_id: line.product_id,
                    quantity: quantity_accorded,
                    direction: MovementDirection::In,
                    operation: MovementOperation::Supply,
                    linked: LinkedDetail::Purchase(line_id),
                },
                initiated_by,
                created_by,
            )
            .await?;

            let mut active: purchase_request_lines::ActiveModel = line.into();
            active.quantity_accorded = Set(Some(quantity_accorded));
            let line = active.update(&txn).await?;

            confirm_invoice_quantity(
                &txn,
                invoices::Column::PurchaseId,
                line.purchase_id,
                line.product_id,
                quantity_accorded,
            )
            .await?;

            txn.commit().await?;
            Ok(movement)
        })
        .await
    }

    /// Confirms shipment of one order line.
    ///
    /// Same shape as purchase receipt with the direction flipped: an
    /// OUT/SALE movement, plus `quantity_real` confirmation on the matching
    /// outgoing invoice line.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound`, `DetailAlreadyDelivered`,
    /// `NonPositiveQuantity`, a stock ledger error, or a database error.
    pub async fn deliver_order_line(
        &self,
        line_id: OrderLineId,
        quantity_accorded: Decimal,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<stock_movements::Model, FulfillmentError> {
        if quantity_accorded <= Decimal::ZERO {
            return Err(FulfillmentError::NonPositiveQuantity);
        }
        let id = line_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let line = order_lines::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::LineNotFound(id))?;
            if line.quantity_accorded.is_some() {
                return Err(FulfillmentError::DetailAlreadyDelivered(id));
            }

            let order = orders::Entity::find_by_id(line.order_id)
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::OrderNotFound(line.order_id))?;

            let movement = deliver_line_in_txn(
                &txn,
                DeliveredLine {
                    area_id: order.area_id,
                    product_id: line.product_id,
                    quantity: quantity_accorded,
                    direction: MovementDirection::Out,
                    operation: MovementOperation::Sale,
                    linked: LinkedDetail::Order(line_id),
                },
                initiated_by,
                created_by,
            )
            .await?;

            let mut active: order_lines::ActiveModel = line.into();
            active.quantity_accorded = Set(Some(quantity_accorded));
            let line = active.update(&txn).await?;

            confirm_invoice_quantity(
                &txn,
                invoices::Column::OrderId,
                line.order_id,
                line.product_id,
                quantity_accorded,
            )
            .await?;

            txn.commit().await?;
            Ok(movement)
        })
        .await
    }

    /// Delivers one sale line: marks it delivered and posts the OUT/SALE
    /// movement for the sold quantity.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound`, `DetailAlreadyDelivered`, a stock ledger
    /// error, or a database error.
    pub async fn deliver_sale_line(
        &self,
        line_id: SaleLineId,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<stock_movements::Model, FulfillmentError> {
        let id = line_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;
            let movement =
                deliver_sale_line_in_txn(&txn, id, line_id, initiated_by, created_by).await?;
            txn.commit().await?;
            Ok(movement)
        })
        .await
    }

    /// Delivers every undelivered line of a purchase in full and marks the
    /// document DELIVERED, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseNotFound`, `NotDeliverable` unless the document is
    /// OPENED, a stock ledger error, or a database error.
    pub async fn deliver_purchase(
        &self,
        purchase_id: PurchaseId,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<Vec<stock_movements::Model>, FulfillmentError> {
        let id = purchase_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let purchase = purchase_requests::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::PurchaseNotFound(id))?;
            if purchase.status != DocumentStatus::Opened {
                return Err(FulfillmentError::NotDeliverable {
                    document: id,
                    status: format!("{:?}", purchase.status),
                });
            }

            let lines = purchase_request_lines::Entity::find()
                .filter(purchase_request_lines::Column::PurchaseId.eq(id))
                .all(&txn)
                .await?;

            let mut movements = Vec::new();
            for line in lines {
                if line.quantity_accorded.is_some() {
                    continue;
                }
                let quantity = line.quantity_requested;
                let movement = deliver_line_in_txn(
                    &txn,
                    DeliveredLine {
                        area_id: purchase.area_id,
                        product_id: line.product_id,
                        quantity,
                        direction: MovementDirection::In,
                        operation: MovementOperation::Supply,
                        linked: LinkedDetail::Purchase(PurchaseLineId::from_uuid(line.id)),
                    },
                    initiated_by,
                    created_by,
                )
                .await?;
                movements.push(movement);

                let product_id = line.product_id;
                let mut active: purchase_request_lines::ActiveModel = line.into();
                active.quantity_accorded = Set(Some(quantity));
                active.update(&txn).await?;

                confirm_invoice_quantity(
                    &txn,
                    invoices::Column::PurchaseId,
                    id,
                    product_id,
                    quantity,
                )
                .await?;
            }

            let mut active: purchase_requests::ActiveModel = purchase.into();
            active.status = Set(DocumentStatus::Delivered);
            active.updated_at = Set(Some(Utc::now().into()));
            active.updated_by = Set(Some(created_by.into_inner()));
            active.update(&txn).await?;

            txn.commit().await?;
            Ok(movements)
        })
        .await
    }

    /// Delivers every undelivered line of an order in full and marks the
    /// document DELIVERED, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound`, `NotDeliverable` unless the document is
    /// OPENED, a stock ledger error, or a database error.
    pub async fn deliver_order(
        &self,
        order_id: OrderId,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<Vec<stock_movements::Model>, FulfillmentError> {
        let id = order_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let order = orders::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::OrderNotFound(id))?;
            if order.status != DocumentStatus::Opened {
                return Err(FulfillmentError::NotDeliverable {
                    document: id,
                    status: format!("{:?}", order.status),
                });
            }

            let lines = order_lines::Entity::find()
                .filter(order_lines::Column::OrderId.eq(id))
                .all(&txn)
                .await?;

            let mut movements = Vec::new();
            for line in lines {
                if line.quantity_accorded.is_some() {
                    continue;
                }
                let quantity = line.quantity_requested;
                let movement = deliver_line_in_txn(
                    &txn,
                    DeliveredLine {
                        area_id: order.area_id,
                        product_id: line.product_id,
                        quantity,
                        direction: MovementDirection::Out,
                        operation: MovementOperation::Sale,
                        linked: LinkedDetail::Order(OrderLineId::from_uuid(line.id)),
                    },
                    initiated_by,
                    created_by,
                )
                .await?;
                movements.push(movement);

                let product_id = line.product_id;
                let mut active: order_lines::ActiveModel = line.into();
                active.quantity_accorded = Set(Some(quantity));
                active.update(&txn).await?;

                confirm_invoice_quantity(&txn, invoices::Column::OrderId, id, product_id, quantity)
                    .await?;
            }

            let mut active: orders::ActiveModel = order.into();
            active.status = Set(DocumentStatus::Delivered);
            active.updated_at = Set(Some(Utc::now().into()));
            active.updated_by = Set(Some(created_by.into_inner()));
            active.update(&txn).await?;

            txn.commit().await?;
            Ok(movements)
        })
        .await
    }

    /// Delivers every undelivered line of a sale and marks it DELIVERED.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound`, `NotDeliverable` unless the sale is PENDING,
    /// a stock ledger error, or a database error.
    pub async fn deliver_sale(
        &self,
        sale_id: SaleId,
        initiated_by: EmployeeId,
        created_by: UserId,
    ) -> Result<Vec<stock_movements::Model>, FulfillmentError> {
        let id = sale_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            let sale = sales::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(FulfillmentError::SaleNotFound(id))?;
            if sale.status != SaleStatus::Pending {
                return Err(FulfillmentError::NotDeliverable {
                    document: id,
                    status: format!("{:?}", sale.status),
                });
            }

            let lines = sale_lines::Entity::find()
                .filter(sale_lines::Column::SaleId.eq(id))
                .all(&txn)
                .await?;

            let mut movements = Vec::new();
            for line in lines {
                if line.delivered_at.is_some() {
                    continue;
                }
                let movement = deliver_sale_line_in_txn(
                    &txn,
                    line.id,
                    SaleLineId::from_uuid(line.id),
                    initiated_by,
                    created_by,
                )
                .await?;
                movements.push(movement);
            }

            let mut active: sales::ActiveModel = sale.into();
            active.status = Set(SaleStatus::Delivered);
            active.updated_at = Set(Some(Utc::now().into()));
            active.updated_by = Set(Some(created_by.into_inner()));
            active.update(&txn).await?;

            txn.commit().await?;
            Ok(movements)
        })
        .await
    }
}

/// A confirmed delivery, normalized across the three document kinds.
struct DeliveredLine {
    area_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    direction: MovementDirection,
    operation: MovementOperation,
    linked: LinkedDetail,
}

/// Posts the stock movement for a confirmed delivery on the caller's
/// transaction.
async fn deliver_line_in_txn(
    txn: &DatabaseTransaction,
    delivered: DeliveredLine,
    initiated_by: EmployeeId,
    created_by: UserId,
) -> Result<stock_movements::Model, FulfillmentError> {
    let movement = insert_movement(
        txn,
        &NewMovement {
            product_id: ProductId::from_uuid(delivered.product_id),
            area_id: AreaId::from_uuid(delivered.area_id),
            direction: delivered.direction,
            operation: delivered.operation,
            quantity: delivered.quantity,
            date_of: Utc::now().date_naive(),
            comment: None,
            initiated_by,
            created_by,
            linked_detail: Some(delivered.linked),
        },
    )
    .await?;
    Ok(movement)
}

/// Delivers one sale line inside the caller's transaction.
async fn deliver_sale_line_in_txn(
    txn: &DatabaseTransaction,
    id: Uuid,
    line_id: SaleLineId,
    initiated_by: EmployeeId,
    created_by: UserId,
) -> Result<stock_movements::Model, FulfillmentError> {
    let line = sale_lines::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(FulfillmentError::LineNotFound(id))?;
    if line.delivered_at.is_some() {
        return Err(FulfillmentError::DetailAlreadyDelivered(id));
    }

    let sale = sales::Entity::find_by_id(line.sale_id)
        .one(txn)
        .await?
        .ok_or(FulfillmentError::SaleNotFound(line.sale_id))?;

    let movement = deliver_line_in_txn(
        txn,
        DeliveredLine {
            area_id: sale.area_id,
            product_id: line.product_id,
            quantity: line.quantity,
            direction: MovementDirection::Out,
            operation: MovementOperation::Sale,
            linked: LinkedDetail::Sale(line_id),
        },
        initiated_by,
        created_by,
    )
    .await?;

    let mut active: sale_lines::ActiveModel = line.into();
    active.delivered_at = Set(Some(Utc::now().into()));
    active.update(txn).await?;

    Ok(movement)
}

/// Confirms `quantity_real` on the invoice line matching a delivered
/// document line, when the document has been invoiced.
async fn confirm_invoice_quantity(
    txn: &DatabaseTransaction,
    document_column: invoices::Column,
    document_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
) -> Result<(), FulfillmentError> {
    let Some(invoice) = invoices::Entity::find()
        .filter(document_column.eq(document_id))
        .one(txn)
        .await?
    else {
        return Ok(());
    };

    let Some(line) = invoice_lines::Entity::find()
        .filter(invoice_lines::Column::InvoiceId.eq(invoice.id))
        .filter(invoice_lines::Column::ProductId.eq(product_id))
        .filter(invoice_lines::Column::QuantityReal.is_null())
        .one(txn)
        .await?
    else {
        return Ok(());
    };

    let mut active: invoice_lines::ActiveModel = line.into();
    active.quantity_real = Set(Some(quantity));
    active.update(txn).await?;
    Ok(())
}
