//! Stock ledger error types.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use super::types::{MovementDirection, MovementOperation};

/// Errors raised by stock ledger rules.
#[derive(Debug, Error)]
pub enum StockError {
    /// The operation is not compatible with the requested direction.
    #[error("Operation {operation:?} cannot be used with direction {direction:?}")]
    InvalidOperationDirection {
        /// The rejected operation.
        operation: MovementOperation,
        /// The rejected direction.
        direction: MovementDirection,
    },

    /// Movement quantity must be strictly positive.
    #[error("Movement quantity must be strictly positive")]
    NonPositiveQuantity,

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Movement not found.
    #[error("Movement not found: {0}")]
    MovementNotFound(Uuid),

    /// The movement is too old to cancel; post an opposite movement instead.
    #[error("Movement created on {created_on} cannot be canceled on {today}; post an opposite movement instead")]
    StaleMovementCancellation {
        /// Business date the movement was recorded on.
        created_on: NaiveDate,
        /// The current business date.
        today: NaiveDate,
    },

    /// The movement has already been reversed.
    #[error("Movement {0} has already been reversed")]
    AlreadyReversed(Uuid),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidOperationDirection { .. } => "INVALID_OPERATION_DIRECTION",
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::StaleMovementCancellation { .. } => "STALE_MOVEMENT_CANCELLATION",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidOperationDirection { .. } | Self::NonPositiveQuantity => 400,
            Self::ProductNotFound(_) | Self::MovementNotFound(_) => 404,
            Self::StaleMovementCancellation { .. } | Self::AlreadyReversed(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StockError::InvalidOperationDirection {
                operation: MovementOperation::Sale,
                direction: MovementDirection::In,
            }
            .error_code(),
            "INVALID_OPERATION_DIRECTION"
        );
        assert_eq!(
            StockError::ProductNotFound(Uuid::nil()).error_code(),
            "PRODUCT_NOT_FOUND"
        );
        assert_eq!(
            StockError::AlreadyReversed(Uuid::nil()).error_code(),
            "ALREADY_REVERSED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(StockError::NonPositiveQuantity.http_status_code(), 400);
        assert_eq!(
            StockError::MovementNotFound(Uuid::nil()).http_status_code(),
            404
        );
        let stale = StockError::StaleMovementCancellation {
            created_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(stale.http_status_code(), 409);
    }

    #[test]
    fn test_stale_cancellation_display() {
        let err = StockError::StaleMovementCancellation {
            created_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Movement created on 2026-03-01 cannot be canceled on 2026-03-02; post an opposite movement instead"
        );
    }
}
