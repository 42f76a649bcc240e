//! Invoice settlement error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::InvoiceStatus;

/// Errors raised by invoice settlement rules.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Payment amounts must be strictly positive.
    #[error("Payment amount must be strictly positive")]
    NonPositiveAmount,

    /// Paying this amount would exceed the amount owed.
    #[error("Payment of {amount} would exceed the remaining {remaining} owed")]
    OverpaymentRejected {
        /// The rejected payment amount.
        amount: Decimal,
        /// `amount_to_pay - amount_payed` at the time of the attempt.
        remaining: Decimal,
    },

    /// The invoice no longer accepts payments.
    #[error("Invoice is {0:?} and no longer accepts payments")]
    PaymentsClosed(InvoiceStatus),

    /// Closing requires the invoice to be fully paid.
    #[error("Cannot close invoice: paid {amount_payed} of {amount_to_pay}")]
    UnderpaidClosure {
        /// Amount paid so far.
        amount_payed: Decimal,
        /// Amount owed.
        amount_to_pay: Decimal,
    },

    /// Rejection requires that nothing was paid.
    #[error("Cannot reject invoice: {amount_payed} has already been paid")]
    RejectedWithPayment {
        /// Amount paid so far.
        amount_payed: Decimal,
    },
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::OverpaymentRejected { .. } => "OVERPAYMENT_REJECTED",
            Self::PaymentsClosed(_) => "PAYMENTS_CLOSED",
            Self::UnderpaidClosure { .. } => "UNDERPAID_CLOSURE",
            Self::RejectedWithPayment { .. } => "REJECTED_WITH_PAYMENT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount => 400,
            Self::InvoiceNotFound(_) => 404,
            Self::OverpaymentRejected { .. }
            | Self::UnderpaidClosure { .. }
            | Self::RejectedWithPayment { .. } => 422,
            Self::PaymentsClosed(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            InvoiceError::OverpaymentRejected {
                amount: dec!(100),
                remaining: dec!(50),
            }
            .error_code(),
            "OVERPAYMENT_REJECTED"
        );
        assert_eq!(
            InvoiceError::UnderpaidClosure {
                amount_payed: dec!(200),
                amount_to_pay: dec!(500),
            }
            .error_code(),
            "UNDERPAID_CLOSURE"
        );
        assert_eq!(
            InvoiceError::RejectedWithPayment {
                amount_payed: dec!(1)
            }
            .error_code(),
            "REJECTED_WITH_PAYMENT"
        );
    }

    #[test]
    fn test_display_carries_amounts() {
        let err = InvoiceError::UnderpaidClosure {
            amount_payed: dec!(200),
            amount_to_pay: dec!(500),
        };
        assert_eq!(err.to_string(), "Cannot close invoice: paid 200 of 500");
    }
}
