//! `SeaORM` entity definitions.

pub mod areas;
pub mod cash_accounts;
pub mod cash_adjustment_lines;
pub mod cash_adjustments;
pub mod cash_transaction_lines;
pub mod cash_transactions;
pub mod denominations;
pub mod employees;
pub mod invoice_lines;
pub mod invoices;
pub mod order_lines;
pub mod orders;
pub mod price_history;
pub mod products;
pub mod purchase_request_lines;
pub mod purchase_requests;
pub mod sale_lines;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod stock_movements;
pub mod users;
