//! Product repository, scoped to the concerns the ledgers touch.
//!
//! Catalog CRUD (descriptive fields) is out of scope; this repository owns
//! the approval lifecycle, price updates with their append-only history, and
//! the periodic purge of rejected products.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tsena_core::stock::ProductState;
use tsena_shared::AppError;
use tsena_shared::types::UserId;

use crate::entities::{price_history, products, sea_orm_active_enums::PriceType};
use crate::retry::{self, TransientError};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// The product's lifecycle does not allow this state change.
    #[error("Product {product} cannot go from {from:?} to {to:?}")]
    InvalidStateChange {
        /// The product.
        product: Uuid,
        /// Current state.
        from: ProductState,
        /// Requested state.
        to: ProductState,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransientError for CatalogError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(err) if retry::is_transient_db_err(err))
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::InvalidStateChange { .. } => Self::StaleState(err.to_string()),
            CatalogError::Database(db) if retry::is_transient_db_err(&db) => {
                Self::Transient(db.to_string())
            }
            CatalogError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a product by id.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or a database error.
    pub async fn get(&self, product_id: Uuid) -> Result<products::Model, CatalogError> {
        products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))
    }

    /// Applies an approval decision to a PENDING product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `InvalidStateChange` if the product is not
    /// PENDING or the decision is not VALIDATED/REJECTED, or a database
    /// error.
    pub async fn approve(
        &self,
        product_id: Uuid,
        decision: ProductState,
    ) -> Result<products::Model, CatalogError> {
        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        let current: ProductState = product.state.into();
        if current != ProductState::Pending || decision == ProductState::Pending {
            return Err(CatalogError::InvalidStateChange {
                product: product_id,
                from: current,
                to: decision,
            });
        }

        let mut active: products::ActiveModel = product.into();
        active.state = Set(decision.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Updates a product's prices, appending a history entry per changed
    /// price in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or a database error.
    pub async fn update_prices(
        &self,
        product_id: Uuid,
        new_purchase_price: Option<Decimal>,
        new_sale_price: Option<Decimal>,
        changed_by: UserId,
    ) -> Result<products::Model, CatalogError> {
        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        let mut changes: Vec<(PriceType, Decimal, Decimal)> = Vec::new();
        if let Some(new_price) = new_purchase_price {
            if new_price != product.purchase_price {
                changes.push((PriceType::Purchase, product.purchase_price, new_price));
            }
        }
        if let Some(new_price) = new_sale_price {
            if new_price != product.sale_price {
                changes.push((PriceType::Sale, product.sale_price, new_price));
            }
        }

        if changes.is_empty() {
            txn.commit().await?;
            return Ok(product);
        }

        for (price_type, old_value, new_value) in &changes {
            price_history::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                price_type: Set(*price_type),
                old_value: Set(*old_value),
                new_value: Set(*new_value),
                created_by: Set(changed_by.into_inner()),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        let mut active: products::ActiveModel = product.into();
        for (price_type, _, new_value) in changes {
            match price_type {
                PriceType::Purchase => active.purchase_price = Set(new_value),
                PriceType::Sale => active.sale_price = Set(new_value),
            }
        }
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Price history for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn price_history(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<price_history::Model>, CatalogError> {
        let entries = price_history::Entity::find()
            .filter(price_history::Column::ProductId.eq(product_id))
            .order_by_desc(price_history::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Deletes REJECTED products for an area.
    ///
    /// Each deletion is its own transaction so the cascade (movements, price
    /// history) of one product cannot hold locks across the whole batch.
    /// Returns the number of products removed.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn purge_rejected(&self, area_id: Uuid) -> Result<u64, CatalogError> {
        let rejected = products::Entity::find()
            .filter(products::Column::AreaId.eq(area_id))
            .filter(products::Column::State.eq(crate::entities::sea_orm_active_enums::ProductState::Rejected))
            .all(&self.db)
            .await?;

        let mut purged = 0u64;
        for product in rejected {
            let id = product.id;
            let txn = self.db.begin().await?;
            product.delete(&txn).await?;
            txn.commit().await?;
            tracing::info!(product_id = %id, "purged rejected product");
            purged += 1;
        }
        Ok(purged)
    }
}
