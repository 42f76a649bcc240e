//! Cash ledger rules.
//!
//! A cash transaction is a discrete movement of physical money, broken into
//! denomination lines. This module owns:
//! - Direction/operation coherence for cash operations
//! - Denomination arithmetic and signed transaction totals
//! - The transaction status machine and cancellation guards
//! - Theoretical balance computation and register balancing outcomes

pub mod balancing;
pub mod error;
pub mod transaction;
pub mod types;

#[cfg(test)]
mod transaction_props;

pub use balancing::{BalancingOutcome, balancing_outcome};
pub use error::CashError;
pub use transaction::{
    check_cancelable, check_status_transition, signed_total, theoretical_amount, unsigned_total,
    validate_transaction,
};
pub use types::{
    AdjustmentKind, CashAccountState, CashOperation, DenominationLine, TransactionDirection,
    TransactionStatus,
};
