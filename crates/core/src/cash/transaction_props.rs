//! Property-based tests for cash transaction rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balancing::{BalancingOutcome, balancing_outcome};
use super::transaction::{signed_total, theoretical_amount, unsigned_total, validate_transaction};
use super::types::{CashOperation, DenominationLine, TransactionDirection, TransactionStatus};
use tsena_shared::types::DenominationId;

/// Strategy to generate a denomination face value (1 ..= 100,000).
fn denomination_value() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000i64).prop_map(Decimal::from)
}

/// Strategy to generate a denomination line with a positive quantity.
fn line_strategy() -> impl Strategy<Value = DenominationLine> {
    (denomination_value(), 1i32..500i32).prop_map(|(value, quantity)| DenominationLine {
        denomination_id: DenominationId::new(),
        value,
        quantity,
    })
}

/// Strategy to generate a direction.
fn direction_strategy() -> impl Strategy<Value = TransactionDirection> {
    prop_oneof![
        Just(TransactionDirection::In),
        Just(TransactionDirection::Out),
    ]
}

/// Strategy to generate an operation.
fn operation_strategy() -> impl Strategy<Value = CashOperation> {
    prop_oneof![
        Just(CashOperation::SalePayment),
        Just(CashOperation::Supply),
        Just(CashOperation::CorrectionIn),
        Just(CashOperation::CorrectionOut),
        Just(CashOperation::BankTransfer),
        Just(CashOperation::MiscExpenseIn),
        Just(CashOperation::MiscExpenseOut),
    ]
}

/// Strategy to generate a status.
fn status_strategy() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Opened),
        Just(TransactionStatus::Finalized),
        Just(TransactionStatus::Completed),
        Just(TransactionStatus::Partial),
        Just(TransactionStatus::Closed),
        Just(TransactionStatus::Canceled),
        Just(TransactionStatus::Rejected),
        Just(TransactionStatus::Failed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Validation accepts a pair exactly when the partition allows it.
    #[test]
    fn prop_validation_matches_partition(
        direction in direction_strategy(),
        operation in operation_strategy(),
        lines in proptest::collection::vec(line_strategy(), 1..6),
    ) {
        let result = validate_transaction(direction, operation, &lines);
        prop_assert_eq!(result.is_ok(), operation.direction() == direction);
    }

    /// The unsigned total is positive for any non-empty line set, and the
    /// signed total has the direction's sign with the same magnitude.
    #[test]
    fn prop_signed_total_sign(
        direction in direction_strategy(),
        lines in proptest::collection::vec(line_strategy(), 1..6),
    ) {
        let unsigned = unsigned_total(&lines);
        prop_assert!(unsigned > Decimal::ZERO);

        let signed = signed_total(direction, &lines);
        prop_assert_eq!(signed.abs(), unsigned);
        match direction {
            TransactionDirection::In => prop_assert!(signed > Decimal::ZERO),
            TransactionDirection::Out => prop_assert!(signed < Decimal::ZERO),
        }
    }

    /// Non-COMPLETED transactions never move the theoretical balance.
    #[test]
    fn prop_theoretical_ignores_non_completed(
        completed in proptest::collection::vec(
            (-1_000_000i64..1_000_000i64).prop_map(Decimal::from),
            0..10,
        ),
        noise in proptest::collection::vec(
            (status_strategy(), (-1_000_000i64..1_000_000i64).prop_map(Decimal::from)),
            0..10,
        ),
    ) {
        let expected: Decimal = completed.iter().copied().sum();

        let mut transactions: Vec<(TransactionStatus, Decimal)> = completed
            .into_iter()
            .map(|amount| (TransactionStatus::Completed, amount))
            .collect();
        transactions.extend(
            noise
                .into_iter()
                .filter(|(status, _)| *status != TransactionStatus::Completed),
        );

        prop_assert_eq!(theoretical_amount(transactions), expected);
    }

    /// Balancing: the discrepancy is always `counted - theoretical`, the
    /// forced flag always wins, and BALANCED means zero discrepancy.
    #[test]
    fn prop_balancing_outcome(
        counted in (0i64..10_000_000i64).prop_map(Decimal::from),
        theoretical in (0i64..10_000_000i64).prop_map(Decimal::from),
        forced in any::<bool>(),
    ) {
        let outcome = balancing_outcome(counted, theoretical, forced);
        prop_assert_eq!(outcome.discrepancy(), counted - theoretical);

        match outcome {
            BalancingOutcome::BalancedForced { .. } => prop_assert!(forced),
            BalancingOutcome::Balanced => {
                prop_assert!(!forced);
                prop_assert_eq!(counted, theoretical);
            }
            BalancingOutcome::NotBalanced { .. } => {
                prop_assert!(!forced);
                prop_assert_ne!(counted, theoretical);
            }
        }
    }
}
