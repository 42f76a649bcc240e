//! Stock ledger repository.
//!
//! Owns the append-only stock movement log and keeps `products.actual_stock`
//! in sync. The aggregate update is a single atomic
//! `UPDATE ... SET actual_stock = actual_stock + delta`: concurrent movements
//! on the same product serialize on the row without a read-modify-write race.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use uuid::Uuid;

use tsena_core::stock::{self, LinkedDetail, NewMovement, StockError};
use tsena_shared::AppError;
use tsena_shared::types::{MovementId, UserId, Window};

use crate::entities::{products, stock_movements};
use crate::retry::{self, TransientError, with_retry};

/// Error types for stock ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum StockLedgerError {
    /// A stock rule was violated; nothing was written.
    #[error(transparent)]
    Rule(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransientError for StockLedgerError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(err) if retry::is_transient_db_err(err))
    }
}

impl From<StockLedgerError> for AppError {
    fn from(err: StockLedgerError) -> Self {
        match err {
            StockLedgerError::Rule(rule) => match rule {
                StockError::InvalidOperationDirection { .. } | StockError::NonPositiveQuantity => {
                    Self::Validation(rule.to_string())
                }
                StockError::ProductNotFound(_) | StockError::MovementNotFound(_) => {
                    Self::NotFound(rule.to_string())
                }
                StockError::StaleMovementCancellation { .. } | StockError::AlreadyReversed(_) => {
                    Self::StaleState(rule.to_string())
                }
            },
            StockLedgerError::Database(db) if retry::is_transient_db_err(&db) => {
                Self::Transient(db.to_string())
            }
            StockLedgerError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// Result of recomputing a product's stock from full movement history.
#[derive(Debug, Clone)]
pub struct StockReconciliation {
    /// The product checked.
    pub product_id: Uuid,
    /// The cached `actual_stock` before the check.
    pub cached: Decimal,
    /// The value derived from the full movement history.
    pub derived: Decimal,
    /// Whether the cached value was overwritten with the derived one.
    pub repaired: bool,
}

impl StockReconciliation {
    /// Returns true if the cached projection matched the ledger.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cached == self.derived
    }
}

/// Stock ledger repository.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
    retry_attempts: u32,
}

impl StockRepository {
    /// Creates a new stock repository.
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

    /// Records a stock movement and updates the product's running stock.
    ///
    /// One transaction covers the movement insert and the product update;
    /// a failure in either half rolls back both.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperationDirection` or `NonPositiveQuantity` before
    /// any write, `ProductNotFound` if the product row does not exist, or a
    /// database error.
    pub async fn create_movement(
        &self,
        input: NewMovement,
    ) -> Result<stock_movements::Model, StockLedgerError> {
        // Reject incoherent input before opening a transaction.
        stock::validate_movement(input.direction, input.operation, input.quantity)?;

        with_retry(self.retry_attempts, || {
            let input = input.clone();
            async move {
                let txn = self.db.begin().await?;
                let movement = insert_movement(&txn, &input).await?;
                txn.commit().await?;
                Ok(movement)
            }
        })
        .await
    }

    /// Cancels a movement recorded today by posting a reversing entry.
    ///
    /// The original row is retained; a CORRECTION entry with the opposite
    /// direction and a `reverses_id` back-reference undoes its effect on the
    /// product, all in one transaction. Movements from prior business dates
    /// fail with `StaleMovementCancellation` and must be compensated with an
    /// opposite movement instead.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound`, `AlreadyReversed`,
    /// `StaleMovementCancellation`, or a database error.
    pub async fn cancel_movement(
        &self,
        movement_id: MovementId,
        canceled_by: UserId,
    ) -> Result<stock_movements::Model, StockLedgerError> {
        let id = movement_id.into_inner();

        with_retry(self.retry_attempts, || async move {
            let txn = self.db.begin().await?;

            // Lock the original so a concurrent movement or second cancel on
            // the same product serializes behind us.
            let original = stock_movements::Entity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(StockError::MovementNotFound(id))?;

            let already_reversed = stock_movements::Entity::find()
                .filter(stock_movements::Column::ReversesId.eq(id))
                .count(&txn)
                .await?
                > 0;

            let now = Utc::now();
            stock::check_cancelable(
                id,
                original.created_at.with_timezone(&Utc),
                already_reversed,
                now.date_naive(),
            )?;

            let entry = stock::reversing_entry(id, original.direction.into(), original.quantity);
            let delta = stock::signed_delta(entry.direction, entry.quantity);
            apply_stock_delta(&txn, original.product_id, delta).await?;

            let reversal = stock_movements::ActiveModel {
                id: Set(Uuid::new_v4()),
                area_id: Set(original.area_id),
                product_id: Set(original.product_id),
                direction: Set(entry.direction.into()),
                operation: Set(entry.operation.into()),
                quantity: Set(entry.quantity),
                date_of: Set(now.date_naive()),
                created_at: Set(now.into()),
                comment: Set(Some(entry.comment)),
                initiated_by: Set(original.initiated_by),
                created_by: Set(canceled_by.into_inner()),
                reverses_id: Set(Some(id)),
                sale_line_id: Set(None),
                purchase_line_id: Set(None),
                order_line_id: Set(None),
            }
            .insert(&txn)
            .await?;

            txn.commit().await?;
            Ok(reversal)
        })
        .await
    }

    /// Movement history for a product within an area and date range, newest
    /// first. Read-only.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn product_stock_track(
        &self,
        product_id: Uuid,
        area_id: Uuid,
        date_begin: chrono::NaiveDate,
        date_end: chrono::NaiveDate,
        window: Window,
    ) -> Result<Vec<stock_movements::Model>, StockLedgerError> {
        let movements = stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id))
            .filter(stock_movements::Column::AreaId.eq(area_id))
            .filter(stock_movements::Column::DateOf.gte(date_begin))
            .filter(stock_movements::Column::DateOf.lte(date_end))
            .order_by_desc(stock_movements::Column::CreatedAt)
            .offset(window.offset())
            .limit(window.limit())
            .all(&self.db)
            .await?;
        Ok(movements)
    }

    /// Recomputes a product's stock from its full movement history.
    ///
    /// The cached `actual_stock` is a materialized projection; this is the
    /// repair/verification routine. With `repair` set, a drifted cache is
    /// overwritten with the derived value.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or a database error.
    pub async fn recompute_stock(
        &self,
        product_id: Uuid,
        repair: bool,
    ) -> Result<StockReconciliation, StockLedgerError> {
        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(StockError::ProductNotFound(product_id))?;

        let movements = stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id))
            .all(&txn)
            .await?;

        let derived = stock::recompute_stock(
            movements
                .iter()
                .map(|m| (m.direction.into(), m.quantity)),
        );
        let cached = product.actual_stock;

        let repaired = repair && cached != derived;
        if repaired {
            tracing::warn!(
                %product_id,
                %cached,
                %derived,
                "stock projection drifted, repairing from ledger"
            );
            let mut active: products::ActiveModel = product.into();
            active.actual_stock = Set(derived);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(StockReconciliation {
            product_id,
            cached,
            derived,
            repaired,
        })
    }
}

/// Applies a signed delta to a product's running stock.
///
/// Single atomic statement: the old value is snapshotted and the new value
/// computed in place, so concurrent writers cannot lose an update.
pub(crate) async fn apply_stock_delta<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    delta: Decimal,
) -> Result<(), StockLedgerError> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE products SET old_stock = actual_stock, actual_stock = actual_stock + $1 \
             WHERE id = $2",
            [delta.into(), product_id.into()],
        ))
        .await?;

    if result.rows_affected() == 0 {
        return Err(StockError::ProductNotFound(product_id).into());
    }
    Ok(())
}

/// Inserts a movement row and updates the product, on an existing connection.
///
/// Used by [`StockRepository::create_movement`] and by the fulfillment
/// repository so delivery triggers share the caller's transaction.
pub(crate) async fn insert_movement<C: ConnectionTrait>(
    conn: &C,
    input: &NewMovement,
) -> Result<stock_movements::Model, StockLedgerError> {
    stock::validate_movement(input.direction, input.operation, input.quantity)?;

    let delta = stock::signed_delta(input.direction, input.quantity);
    apply_stock_delta(conn, input.product_id.into_inner(), delta).await?;

    let (sale_line_id, purchase_line_id, order_line_id) = match input.linked_detail {
        Some(LinkedDetail::Sale(id)) => (Some(id.into_inner()), None, None),
        Some(LinkedDetail::Purchase(id)) => (None, Some(id.into_inner()), None),
        Some(LinkedDetail::Order(id)) => (None, None, Some(id.into_inner())),
        None => (None, None, None),
    };

    let movement = stock_movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        area_id: Set(input.area_id.into_inner()),
        product_id: Set(input.product_id.into_inner()),
        direction: Set(input.direction.into()),
        operation: Set(input.operation.into()),
        quantity: Set(input.quantity),
        date_of: Set(input.date_of),
        created_at: Set(Utc::now().into()),
        comment: Set(input.comment.clone()),
        initiated_by: Set(input.initiated_by.into_inner()),
        created_by: Set(input.created_by.into_inner()),
        reverses_id: Set(None),
        sale_line_id: Set(sale_line_id),
        purchase_line_id: Set(purchase_line_id),
        order_line_id: Set(order_line_id),
    }
    .insert(conn)
    .await?;

    Ok(movement)
}
