//! Stock ledger rules.
//!
//! The stock ledger is an append-only record of quantity changes per product.
//! This module owns the pure rules:
//! - Direction/operation coherence
//! - Signed stock deltas
//! - The same-day cancellation policy and reversing entries
//! - Stock recomputation from full history
//!
//! Persistence and the atomic aggregate update live in `tsena-db`.

pub mod error;
pub mod movement;
pub mod types;

#[cfg(test)]
mod movement_props;

pub use error::StockError;
pub use movement::{
    ReversingEntry, check_cancelable, recompute_stock, reversing_entry, signed_delta,
    validate_movement,
};
pub use types::{LinkedDetail, MovementDirection, MovementOperation, NewMovement, ProductState};
