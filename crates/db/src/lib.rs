//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions wrapping every ledger operation in one atomic
//!   database transaction
//! - Database migrations
//! - Bounded retry for serialization failures and deadlocks

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod retry;

pub use repositories::{
    CashRepository, FulfillmentRepository, InvoiceRepository, ProductRepository, StockRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
