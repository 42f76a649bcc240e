//! Transaction validation, totals, and status guards.
//!
//! The transaction total is never stored: it is always recomputed from the
//! denomination lines so the stored rows cannot drift from the derived value.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CashError;
use super::types::{
    CashOperation, DenominationLine, TransactionDirection, TransactionStatus,
};

/// Validates a cash transaction before it is persisted.
///
/// # Errors
///
/// Returns `InvalidOperationDirection`, `EmptyDetailLines`, or
/// `NonPositiveQuantity`.
pub fn validate_transaction(
    direction: TransactionDirection,
    operation: CashOperation,
    lines: &[DenominationLine],
) -> Result<(), CashError> {
    if !operation.allows(direction) {
        return Err(CashError::InvalidOperationDirection {
            operation,
            direction,
        });
    }
    if lines.is_empty() {
        return Err(CashError::EmptyDetailLines);
    }
    if lines.iter().any(|line| line.quantity <= 0) {
        return Err(CashError::NonPositiveQuantity);
    }
    Ok(())
}

/// Sum of the denomination lines, always positive.
#[must_use]
pub fn unsigned_total(lines: &[DenominationLine]) -> Decimal {
    lines.iter().map(DenominationLine::amount).sum()
}

/// Signed transaction total: the line sum, negated when direction is OUT.
#[must_use]
pub fn signed_total(direction: TransactionDirection, lines: &[DenominationLine]) -> Decimal {
    direction.sign() * unsigned_total(lines)
}

/// Theoretical register balance from a day's transactions.
///
/// Only transactions whose status counts toward the balance (COMPLETED)
/// contribute; each contributes its signed total.
#[must_use]
pub fn theoretical_amount<I>(transactions: I) -> Decimal
where
    I: IntoIterator<Item = (TransactionStatus, Decimal)>,
{
    transactions
        .into_iter()
        .filter(|(status, _)| status.counts_toward_balance())
        .map(|(_, signed)| signed)
        .sum()
}

/// Checks whether a transaction may be canceled.
///
/// Cancellation retains the row for audit; it never deletes. Sale payments
/// are never cancelable: the money physically changed hands, so the register
/// is fixed with an offsetting correction.
///
/// # Errors
///
/// Returns `AlreadyCanceled` or `NonCancelableOperation`.
pub fn check_cancelable(
    transaction_id: Uuid,
    status: TransactionStatus,
    operation: CashOperation,
) -> Result<(), CashError> {
    if status == TransactionStatus::Canceled {
        return Err(CashError::AlreadyCanceled(transaction_id));
    }
    if operation == CashOperation::SalePayment {
        return Err(CashError::NonCancelableOperation);
    }
    Ok(())
}

/// Checks a plain (non-cancel) status update against the lifecycle.
///
/// Forward progression only: PENDING → OPENED → FINALIZED → COMPLETED, with
/// PARTIAL as an intermediate settlement state and REJECTED/FAILED as exits
/// from any non-terminal state. Terminal states only change through the
/// explicit cancel action.
///
/// # Errors
///
/// Returns `InvalidStatusTransition`.
pub fn check_status_transition(
    from: TransactionStatus,
    to: TransactionStatus,
) -> Result<(), CashError> {
    use TransactionStatus as S;

    let allowed = match from {
        S::Pending => matches!(
            to,
            S::Opened | S::Finalized | S::Completed | S::Partial | S::Rejected | S::Failed
        ),
        S::Opened => matches!(
            to,
            S::Finalized | S::Completed | S::Partial | S::Rejected | S::Failed
        ),
        S::Finalized => matches!(to, S::Completed | S::Partial | S::Rejected | S::Failed),
        S::Partial => matches!(to, S::Completed | S::Rejected | S::Failed),
        // Terminal: no plain update leaves these states.
        S::Completed | S::Closed | S::Canceled | S::Rejected | S::Failed => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CashError::InvalidStatusTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tsena_shared::types::DenominationId;

    fn line(value: Decimal, quantity: i32) -> DenominationLine {
        DenominationLine {
            denomination_id: DenominationId::new(),
            value,
            quantity,
        }
    }

    #[test]
    fn test_bank_transfer_in_is_rejected() {
        let result = validate_transaction(
            TransactionDirection::In,
            CashOperation::BankTransfer,
            &[line(dec!(10000), 2)],
        );
        assert!(matches!(
            result,
            Err(CashError::InvalidOperationDirection { .. })
        ));
    }

    #[test]
    fn test_sale_payment_out_is_rejected() {
        let result = validate_transaction(
            TransactionDirection::Out,
            CashOperation::SalePayment,
            &[line(dec!(10000), 2)],
        );
        assert!(matches!(
            result,
            Err(CashError::InvalidOperationDirection { .. })
        ));
    }

    #[test]
    fn test_empty_lines_rejected() {
        let result =
            validate_transaction(TransactionDirection::In, CashOperation::SalePayment, &[]);
        assert!(matches!(result, Err(CashError::EmptyDetailLines)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let result = validate_transaction(
            TransactionDirection::In,
            CashOperation::SalePayment,
            &[line(dec!(10000), 0)],
        );
        assert!(matches!(result, Err(CashError::NonPositiveQuantity)));
    }

    #[test]
    fn test_unsigned_total_sums_lines() {
        // 5 x 20,000 + 3 x 10,000 + 4 x 500
        let lines = [
            line(dec!(20000), 5),
            line(dec!(10000), 3),
            line(dec!(500), 4),
        ];
        assert_eq!(unsigned_total(&lines), dec!(132000));
    }

    #[test]
    fn test_signed_total_negates_out() {
        let lines = [line(dec!(20000), 5)];
        assert_eq!(signed_total(TransactionDirection::In, &lines), dec!(100000));
        assert_eq!(
            signed_total(TransactionDirection::Out, &lines),
            dec!(-100000)
        );
    }

    #[test]
    fn test_theoretical_amount_only_counts_completed() {
        let amount = theoretical_amount(vec![
            (TransactionStatus::Completed, dec!(150000)),
            (TransactionStatus::Completed, dec!(-20000)),
            (TransactionStatus::Pending, dec!(99999)),
            (TransactionStatus::Canceled, dec!(-99999)),
            (TransactionStatus::Failed, dec!(1)),
        ]);
        assert_eq!(amount, dec!(130000));
    }

    #[test]
    fn test_cancel_completed_supply_allowed() {
        assert!(
            check_cancelable(
                Uuid::new_v4(),
                TransactionStatus::Completed,
                CashOperation::Supply,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_cancel_twice_rejected() {
        let id = Uuid::new_v4();
        let result = check_cancelable(id, TransactionStatus::Canceled, CashOperation::Supply);
        assert!(matches!(result, Err(CashError::AlreadyCanceled(found)) if found == id));
    }

    #[test]
    fn test_sale_payment_never_cancelable() {
        let result = check_cancelable(
            Uuid::new_v4(),
            TransactionStatus::Completed,
            CashOperation::SalePayment,
        );
        assert!(matches!(result, Err(CashError::NonCancelableOperation)));
    }

    #[test]
    fn test_status_progression() {
        use TransactionStatus as S;
        assert!(check_status_transition(S::Pending, S::Opened).is_ok());
        assert!(check_status_transition(S::Opened, S::Finalized).is_ok());
        assert!(check_status_transition(S::Finalized, S::Completed).is_ok());
        assert!(check_status_transition(S::Pending, S::Completed).is_ok());
        assert!(check_status_transition(S::Partial, S::Completed).is_ok());
    }

    #[test]
    fn test_no_backward_or_terminal_transitions() {
        use TransactionStatus as S;
        assert!(check_status_transition(S::Completed, S::Pending).is_err());
        assert!(check_status_transition(S::Completed, S::Canceled).is_err());
        assert!(check_status_transition(S::Canceled, S::Pending).is_err());
        assert!(check_status_transition(S::Opened, S::Pending).is_err());
        assert!(check_status_transition(S::Failed, S::Completed).is_err());
    }
}
