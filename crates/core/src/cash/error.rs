//! Cash ledger error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::{CashAccountState, CashOperation, TransactionDirection, TransactionStatus};

/// Errors raised by cash ledger rules.
#[derive(Debug, Error)]
pub enum CashError {
    /// The operation is not compatible with the requested direction.
    #[error("Operation {operation:?} cannot be used with direction {direction:?}")]
    InvalidOperationDirection {
        /// The rejected operation.
        operation: CashOperation,
        /// The rejected direction.
        direction: TransactionDirection,
    },

    /// A transaction needs at least one denomination line.
    #[error("Transaction must have at least one denomination line")]
    EmptyDetailLines,

    /// Denomination quantities must be strictly positive.
    #[error("Denomination quantity must be strictly positive")]
    NonPositiveQuantity,

    /// Cash account not found.
    #[error("Cash account not found: {0}")]
    AccountNotFound(Uuid),

    /// Transaction not found.
    #[error("Cash transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// The account no longer accepts transactions.
    #[error("Cash account {account} is {state:?} and does not accept transactions")]
    AccountNotOpen {
        /// The account.
        account: Uuid,
        /// Its current state.
        state: CashAccountState,
    },

    /// The transaction is already canceled.
    #[error("Transaction {0} is already canceled")]
    AlreadyCanceled(Uuid),

    /// Sale payments can never be canceled directly; money that physically
    /// changed hands is corrected with an offsetting CORRECTION transaction.
    #[error("Sale payments cannot be canceled directly; record a correction instead")]
    NonCancelableOperation,

    /// The requested status change is not allowed.
    #[error("Cannot move transaction from {from:?} to {to:?}")]
    InvalidStatusTransition {
        /// Current status.
        from: TransactionStatus,
        /// Requested status.
        to: TransactionStatus,
    },

    /// The account's state does not allow the requested lifecycle action.
    #[error("Cash account {account} cannot go from {from:?} to {to:?}")]
    InvalidAccountState {
        /// The account.
        account: Uuid,
        /// Current state.
        from: CashAccountState,
        /// Requested state.
        to: CashAccountState,
    },
}

impl CashError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidOperationDirection { .. } => "INVALID_OPERATION_DIRECTION",
            Self::EmptyDetailLines => "EMPTY_DETAIL_LINES",
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::AccountNotFound(_) => "CASH_ACCOUNT_NOT_FOUND",
            Self::TransactionNotFound(_) => "CASH_TRANSACTION_NOT_FOUND",
            Self::AccountNotOpen { .. } => "ACCOUNT_NOT_OPEN",
            Self::AlreadyCanceled(_) => "ALREADY_CANCELED",
            Self::NonCancelableOperation => "NON_CANCELABLE_OPERATION",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::InvalidAccountState { .. } => "INVALID_ACCOUNT_STATE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidOperationDirection { .. }
            | Self::EmptyDetailLines
            | Self::NonPositiveQuantity => 400,
            Self::AccountNotFound(_) | Self::TransactionNotFound(_) => 404,
            Self::AccountNotOpen { .. }
            | Self::AlreadyCanceled(_)
            | Self::NonCancelableOperation
            | Self::InvalidStatusTransition { .. }
            | Self::InvalidAccountState { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CashError::AlreadyCanceled(Uuid::nil()).error_code(),
            "ALREADY_CANCELED"
        );
        assert_eq!(
            CashError::NonCancelableOperation.error_code(),
            "NON_CANCELABLE_OPERATION"
        );
        assert_eq!(CashError::EmptyDetailLines.error_code(), "EMPTY_DETAIL_LINES");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CashError::EmptyDetailLines.http_status_code(), 400);
        assert_eq!(
            CashError::AccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            CashError::AlreadyCanceled(Uuid::nil()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_non_cancelable_display_mentions_correction() {
        assert!(
            CashError::NonCancelableOperation
                .to_string()
                .contains("correction")
        );
    }
}
