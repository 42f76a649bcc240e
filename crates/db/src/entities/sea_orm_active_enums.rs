//! `SeaORM` active enums mirroring the PostgreSQL enum types.
//!
//! Conversions to and from the `tsena-core` domain enums live here so the
//! repositories can hand rows straight to the pure rules.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tsena_core::cash;
use tsena_core::invoice;
use tsena_core::stock;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_direction")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Quantity enters the stock.
    #[sea_orm(string_value = "in")]
    In,
    /// Quantity leaves the stock.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<stock::MovementDirection> for MovementDirection {
    fn from(value: stock::MovementDirection) -> Self {
        match value {
            stock::MovementDirection::In => Self::In,
            stock::MovementDirection::Out => Self::Out,
        }
    }
}

impl From<MovementDirection> for stock::MovementDirection {
    fn from(value: MovementDirection) -> Self {
        match value {
            MovementDirection::In => Self::In,
            MovementDirection::Out => Self::Out,
        }
    }
}

/// Business operation behind a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_operation")]
#[serde(rename_all = "snake_case")]
pub enum MovementOperation {
    /// Delivery of a sale.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Receipt from a supplier.
    #[sea_orm(string_value = "supply")]
    Supply,
    /// Manual correction.
    #[sea_orm(string_value = "correction")]
    Correction,
    /// Goods sent back to a supplier.
    #[sea_orm(string_value = "return_supplier")]
    ReturnSupplier,
    /// Goods returned by a customer.
    #[sea_orm(string_value = "return_customer")]
    ReturnCustomer,
    /// Donation, breakage, theft, expiry.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<stock::MovementOperation> for MovementOperation {
    fn from(value: stock::MovementOperation) -> Self {
        match value {
            stock::MovementOperation::Sale => Self::Sale,
            stock::MovementOperation::Supply => Self::Supply,
            stock::MovementOperation::Correction => Self::Correction,
            stock::MovementOperation::ReturnSupplier => Self::ReturnSupplier,
            stock::MovementOperation::ReturnCustomer => Self::ReturnCustomer,
            stock::MovementOperation::Other => Self::Other,
        }
    }
}

impl From<MovementOperation> for stock::MovementOperation {
    fn from(value: MovementOperation) -> Self {
        match value {
            MovementOperation::Sale => Self::Sale,
            MovementOperation::Supply => Self::Supply,
            MovementOperation::Correction => Self::Correction,
            MovementOperation::ReturnSupplier => Self::ReturnSupplier,
            MovementOperation::ReturnCustomer => Self::ReturnCustomer,
            MovementOperation::Other => Self::Other,
        }
    }
}

/// Product approval lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_state")]
#[serde(rename_all = "lowercase")]
pub enum ProductState {
    /// Awaiting approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved.
    #[sea_orm(string_value = "validated")]
    Validated,
    /// Refused; purge-eligible.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<stock::ProductState> for ProductState {
    fn from(value: stock::ProductState) -> Self {
        match value {
            stock::ProductState::Pending => Self::Pending,
            stock::ProductState::Validated => Self::Validated,
            stock::ProductState::Rejected => Self::Rejected,
        }
    }
}

impl From<ProductState> for stock::ProductState {
    fn from(value: ProductState) -> Self {
        match value {
            ProductState::Pending => Self::Pending,
            ProductState::Validated => Self::Validated,
            ProductState::Rejected => Self::Rejected,
        }
    }
}

/// Which price a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "price_type")]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Sale price.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Purchase price.
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

/// Direction of a cash transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_direction")]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Money enters the register.
    #[sea_orm(string_value = "in")]
    In,
    /// Money leaves the register.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<cash::TransactionDirection> for TransactionDirection {
    fn from(value: cash::TransactionDirection) -> Self {
        match value {
            cash::TransactionDirection::In => Self::In,
            cash::TransactionDirection::Out => Self::Out,
        }
    }
}

impl From<TransactionDirection> for cash::TransactionDirection {
    fn from(value: TransactionDirection) -> Self {
        match value {
            TransactionDirection::In => Self::In,
            TransactionDirection::Out => Self::Out,
        }
    }
}

/// Business purpose of a cash transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_operation")]
#[serde(rename_all = "snake_case")]
pub enum CashOperation {
    /// Customer payment for a sale.
    #[sea_orm(string_value = "sale_payment")]
    SalePayment,
    /// Register replenishment.
    #[sea_orm(string_value = "supply")]
    Supply,
    /// Correction adding money.
    #[sea_orm(string_value = "correction_in")]
    CorrectionIn,
    /// Correction removing money.
    #[sea_orm(string_value = "correction_out")]
    CorrectionOut,
    /// Cash taken to the bank.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Miscellaneous inflow.
    #[sea_orm(string_value = "misc_expense_in")]
    MiscExpenseIn,
    /// Miscellaneous outflow.
    #[sea_orm(string_value = "misc_expense_out")]
    MiscExpenseOut,
}

impl From<cash::CashOperation> for CashOperation {
    fn from(value: cash::CashOperation) -> Self {
        match value {
            cash::CashOperation::SalePayment => Self::SalePayment,
            cash::CashOperation::Supply => Self::Supply,
            cash::CashOperation::CorrectionIn => Self::CorrectionIn,
            cash::CashOperation::CorrectionOut => Self::CorrectionOut,
            cash::CashOperation::BankTransfer => Self::BankTransfer,
            cash::CashOperation::MiscExpenseIn => Self::MiscExpenseIn,
            cash::CashOperation::MiscExpenseOut => Self::MiscExpenseOut,
        }
    }
}

impl From<CashOperation> for cash::CashOperation {
    fn from(value: CashOperation) -> Self {
        match value {
            CashOperation::SalePayment => Self::SalePayment,
            CashOperation::Supply => Self::Supply,
            CashOperation::CorrectionIn => Self::CorrectionIn,
            CashOperation::CorrectionOut => Self::CorrectionOut,
            CashOperation::BankTransfer => Self::BankTransfer,
            CashOperation::MiscExpenseIn => Self::MiscExpenseIn,
            CashOperation::MiscExpenseOut => Self::MiscExpenseOut,
        }
    }
}

/// Settlement status shared by cash transactions and invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Recorded, not yet progressed.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Acknowledged and in flight.
    #[sea_orm(string_value = "opened")]
    Opened,
    /// Evidence received.
    #[sea_orm(string_value = "finalized")]
    Finalized,
    /// Confirmed.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Partially settled.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Closed.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Canceled; retained for audit.
    #[sea_orm(string_value = "canceled")]
    Canceled,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Failed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl From<cash::TransactionStatus> for SettlementStatus {
    fn from(value: cash::TransactionStatus) -> Self {
        match value {
            cash::TransactionStatus::Pending => Self::Pending,
            cash::TransactionStatus::Opened => Self::Opened,
            cash::TransactionStatus::Finalized => Self::Finalized,
            cash::TransactionStatus::Completed => Self::Completed,
            cash::TransactionStatus::Partial => Self::Partial,
            cash::TransactionStatus::Closed => Self::Closed,
            cash::TransactionStatus::Canceled => Self::Canceled,
            cash::TransactionStatus::Rejected => Self::Rejected,
            cash::TransactionStatus::Failed => Self::Failed,
        }
    }
}

impl From<SettlementStatus> for cash::TransactionStatus {
    fn from(value: SettlementStatus) -> Self {
        match value {
            SettlementStatus::Pending => Self::Pending,
            SettlementStatus::Opened => Self::Opened,
            SettlementStatus::Finalized => Self::Finalized,
            SettlementStatus::Completed => Self::Completed,
            SettlementStatus::Partial => Self::Partial,
            SettlementStatus::Closed => Self::Closed,
            SettlementStatus::Canceled => Self::Canceled,
            SettlementStatus::Rejected => Self::Rejected,
            SettlementStatus::Failed => Self::Failed,
        }
    }
}

impl From<invoice::InvoiceStatus> for SettlementStatus {
    fn from(value: invoice::InvoiceStatus) -> Self {
        match value {
            invoice::InvoiceStatus::Pending => Self::Pending,
            invoice::InvoiceStatus::Opened => Self::Opened,
            invoice::InvoiceStatus::Finalized => Self::Finalized,
            invoice::InvoiceStatus::Completed => Self::Completed,
            invoice::InvoiceStatus::Partial => Self::Partial,
            invoice::InvoiceStatus::Closed => Self::Closed,
            invoice::InvoiceStatus::Canceled => Self::Canceled,
            invoice::InvoiceStatus::Rejected => Self::Rejected,
            invoice::InvoiceStatus::Failed => Self::Failed,
        }
    }
}

impl From<SettlementStatus> for invoice::InvoiceStatus {
    fn from(value: SettlementStatus) -> Self {
        match value {
            SettlementStatus::Pending => Self::Pending,
            SettlementStatus::Opened => Self::Opened,
            SettlementStatus::Finalized => Self::Finalized,
            SettlementStatus::Completed => Self::Completed,
            SettlementStatus::Partial => Self::Partial,
            SettlementStatus::Closed => Self::Closed,
            SettlementStatus::Canceled => Self::Canceled,
            SettlementStatus::Rejected => Self::Rejected,
            SettlementStatus::Failed => Self::Failed,
        }
    }
}

/// Cash register lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_account_state")]
#[serde(rename_all = "snake_case")]
pub enum CashAccountState {
    /// Accepting transactions.
    #[sea_orm(string_value = "open")]
    Open,
    /// Terminal.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Count matched.
    #[sea_orm(string_value = "balanced")]
    Balanced,
    /// Count differed.
    #[sea_orm(string_value = "not_balanced")]
    NotBalanced,
    /// Discrepancy force-accepted.
    #[sea_orm(string_value = "balanced_forced")]
    BalancedForced,
}

impl From<cash::CashAccountState> for CashAccountState {
    fn from(value: cash::CashAccountState) -> Self {
        match value {
            cash::CashAccountState::Open => Self::Open,
            cash::CashAccountState::Closed => Self::Closed,
            cash::CashAccountState::Balanced => Self::Balanced,
            cash::CashAccountState::NotBalanced => Self::NotBalanced,
            cash::CashAccountState::BalancedForced => Self::BalancedForced,
        }
    }
}

impl From<CashAccountState> for cash::CashAccountState {
    fn from(value: CashAccountState) -> Self {
        match value {
            CashAccountState::Open => Self::Open,
            CashAccountState::Closed => Self::Closed,
            CashAccountState::Balanced => Self::Balanced,
            CashAccountState::NotBalanced => Self::NotBalanced,
            CashAccountState::BalancedForced => Self::BalancedForced,
        }
    }
}

/// Reason a cash adjustment was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "adjustment_kind")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Opening float count.
    #[sea_orm(string_value = "opening")]
    Opening,
    /// End-of-period reconciliation count.
    #[sea_orm(string_value = "balancing")]
    Balancing,
    /// Supervisor override.
    #[sea_orm(string_value = "forcing_balance")]
    ForcingBalance,
}

impl From<cash::AdjustmentKind> for AdjustmentKind {
    fn from(value: cash::AdjustmentKind) -> Self {
        match value {
            cash::AdjustmentKind::Opening => Self::Opening,
            cash::AdjustmentKind::Balancing => Self::Balancing,
            cash::AdjustmentKind::ForcingBalance => Self::ForcingBalance,
        }
    }
}

impl From<AdjustmentKind> for cash::AdjustmentKind {
    fn from(value: AdjustmentKind) -> Self {
        match value {
            AdjustmentKind::Opening => Self::Opening,
            AdjustmentKind::Balancing => Self::Balancing,
            AdjustmentKind::ForcingBalance => Self::ForcingBalance,
        }
    }
}

/// Incoming (supplier) or outgoing (customer) invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_type")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Incoming invoice, from a purchase request.
    #[sea_orm(string_value = "in")]
    In,
    /// Outgoing invoice, from a customer order.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<invoice::InvoiceType> for InvoiceType {
    fn from(value: invoice::InvoiceType) -> Self {
        match value {
            invoice::InvoiceType::In => Self::In,
            invoice::InvoiceType::Out => Self::Out,
        }
    }
}

impl From<InvoiceType> for invoice::InvoiceType {
    fn from(value: InvoiceType) -> Self {
        match value {
            InvoiceType::In => Self::In,
            InvoiceType::Out => Self::Out,
        }
    }
}

/// Purchase request / customer order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Issued and awaiting delivery.
    #[sea_orm(string_value = "opened")]
    Opened,
    /// All lines delivered.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Closed (rejected or converted to an invoice).
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Sale lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sale_status")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Recorded, not yet delivered.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Delivered to the customer.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
