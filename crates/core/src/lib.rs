//! Core business logic for Tsena.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain rules for the three ledgers live here.
//!
//! # Modules
//!
//! - `stock` - Stock movement rules: direction/operation coherence, signed
//!   deltas, the same-day cancellation policy, and reversing entries
//! - `cash` - Cash transaction rules: denomination arithmetic, theoretical
//!   balance, cancellation guards, and register balancing
//! - `invoice` - Invoice settlement: partial payments and status gates

pub mod cash;
pub mod invoice;
pub mod stock;
