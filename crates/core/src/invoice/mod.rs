//! Invoice settlement rules.
//!
//! An invoice tracks amount owed versus amount paid against a purchase or a
//! customer order. This module owns:
//! - Derived totals over detail lines (never cached)
//! - Partial-payment accumulation with the overpayment guard
//! - Status transitions gated on payment completeness

pub mod error;
pub mod settlement;
pub mod types;

pub use error::InvoiceError;
pub use settlement::{apply_payment, check_status_transition};
pub use types::{InvoiceLineAmounts, InvoiceStatus, InvoiceType, amount_to_pay, total_amount};
