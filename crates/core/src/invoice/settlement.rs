//! Payment accumulation and status gates.
//!
//! `amount_payed` is the one cached settlement aggregate; `amount_to_pay` is
//! always derived from freshly-loaded lines, so both checks here must run in
//! the same storage transaction as the write they guard.

use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::InvoiceStatus;

/// Applies a partial payment, returning the new `amount_payed`.
///
/// Does not change the invoice status: status transitions are explicit
/// caller-driven actions checked by [`check_status_transition`].
///
/// # Errors
///
/// Returns `NonPositiveAmount`, `PaymentsClosed`, or `OverpaymentRejected`;
/// on error nothing may be written.
pub fn apply_payment(
    status: InvoiceStatus,
    amount_payed: Decimal,
    amount_to_pay: Decimal,
    amount: Decimal,
) -> Result<Decimal, InvoiceError> {
    if amount <= Decimal::ZERO {
        return Err(InvoiceError::NonPositiveAmount);
    }
    if !status.accepts_payments() {
        return Err(InvoiceError::PaymentsClosed(status));
    }
    let new_amount_payed = amount_payed + amount;
    if new_amount_payed > amount_to_pay {
        return Err(InvoiceError::OverpaymentRejected {
            amount,
            remaining: amount_to_pay - amount_payed,
        });
    }
    Ok(new_amount_payed)
}

/// Checks a status transition against the settlement gates.
///
/// CLOSED requires full payment; REJECTED requires that nothing was paid.
/// Other transitions carry no payment constraint.
///
/// # Errors
///
/// Returns `UnderpaidClosure` or `RejectedWithPayment`.
pub fn check_status_transition(
    new_status: InvoiceStatus,
    amount_payed: Decimal,
    amount_to_pay: Decimal,
) -> Result<(), InvoiceError> {
    match new_status {
        InvoiceStatus::Closed if amount_payed < amount_to_pay => {
            Err(InvoiceError::UnderpaidClosure {
                amount_payed,
                amount_to_pay,
            })
        }
        InvoiceStatus::Rejected if amount_payed > Decimal::ZERO => {
            Err(InvoiceError::RejectedWithPayment { amount_payed })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_payment_accumulates() {
        let payed = apply_payment(InvoiceStatus::Pending, dec!(0), dec!(500), dec!(200)).unwrap();
        assert_eq!(payed, dec!(200));
        let payed = apply_payment(InvoiceStatus::Partial, payed, dec!(500), dec!(300)).unwrap();
        assert_eq!(payed, dec!(500));
    }

    #[test]
    fn test_overpayment_rejected_with_remaining() {
        let result = apply_payment(InvoiceStatus::Pending, dec!(400), dec!(500), dec!(200));
        assert!(matches!(
            result,
            Err(InvoiceError::OverpaymentRejected {
                amount,
                remaining,
            }) if amount == dec!(200) && remaining == dec!(100)
        ));
    }

    #[test]
    fn test_exact_payment_accepted() {
        let payed = apply_payment(InvoiceStatus::Pending, dec!(400), dec!(500), dec!(100)).unwrap();
        assert_eq!(payed, dec!(500));
    }

    #[test]
    fn test_non_positive_payment_rejected() {
        for amount in [dec!(0), dec!(-10)] {
            assert!(matches!(
                apply_payment(InvoiceStatus::Pending, dec!(0), dec!(500), amount),
                Err(InvoiceError::NonPositiveAmount)
            ));
        }
    }

    #[test]
    fn test_payment_on_closed_invoice_rejected() {
        let result = apply_payment(InvoiceStatus::Closed, dec!(500), dec!(500), dec!(1));
        assert!(matches!(
            result,
            Err(InvoiceError::PaymentsClosed(InvoiceStatus::Closed))
        ));
    }

    #[test]
    fn test_underpaid_closure_rejected() {
        let result = check_status_transition(InvoiceStatus::Closed, dec!(200), dec!(500));
        assert!(matches!(result, Err(InvoiceError::UnderpaidClosure { .. })));
    }

    #[test]
    fn test_fully_paid_closure_allowed() {
        assert!(check_status_transition(InvoiceStatus::Closed, dec!(500), dec!(500)).is_ok());
    }

    #[test]
    fn test_reject_with_payment_rejected() {
        let result = check_status_transition(InvoiceStatus::Rejected, dec!(1), dec!(500));
        assert!(matches!(
            result,
            Err(InvoiceError::RejectedWithPayment { .. })
        ));
    }

    #[test]
    fn test_reject_unpaid_allowed() {
        assert!(check_status_transition(InvoiceStatus::Rejected, dec!(0), dec!(500)).is_ok());
    }

    #[test]
    fn test_other_transitions_unconstrained() {
        assert!(check_status_transition(InvoiceStatus::Partial, dec!(200), dec!(500)).is_ok());
        assert!(check_status_transition(InvoiceStatus::Opened, dec!(0), dec!(500)).is_ok());
    }
}
