//! Property-based tests for stock movement rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::movement::{recompute_stock, reversing_entry, signed_delta, validate_movement};
use super::types::{MovementDirection, MovementOperation};
use crate::stock::StockError;

/// Strategy to generate a strictly positive quantity (0.01 ..= 1,000,000.00).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Strategy to generate a direction.
fn direction_strategy() -> impl Strategy<Value = MovementDirection> {
    prop_oneof![Just(MovementDirection::In), Just(MovementDirection::Out)]
}

/// Strategy to generate an operation.
fn operation_strategy() -> impl Strategy<Value = MovementOperation> {
    prop_oneof![
        Just(MovementOperation::Sale),
        Just(MovementOperation::Supply),
        Just(MovementOperation::Correction),
        Just(MovementOperation::ReturnSupplier),
        Just(MovementOperation::ReturnCustomer),
        Just(MovementOperation::Other),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A movement passes validation exactly when the coherence table allows
    /// the pair; validation never depends on the quantity once positive.
    #[test]
    fn prop_validation_matches_coherence_table(
        direction in direction_strategy(),
        operation in operation_strategy(),
        quantity in positive_quantity(),
    ) {
        let result = validate_movement(direction, operation, quantity);
        prop_assert_eq!(result.is_ok(), operation.allows(direction));
    }

    /// Non-positive quantities are always rejected, whatever the pair.
    #[test]
    fn prop_non_positive_quantity_rejected(
        direction in direction_strategy(),
        operation in operation_strategy(),
        quantity in (0i64..100_000_000i64).prop_map(|h| Decimal::new(-h, 2)),
    ) {
        let result = validate_movement(direction, operation, quantity);
        let rejected = matches!(
            result,
            Err(StockError::NonPositiveQuantity | StockError::InvalidOperationDirection { .. })
        );
        prop_assert!(rejected);
        if operation.allows(direction) {
            prop_assert!(matches!(result, Err(StockError::NonPositiveQuantity)));
        }
    }

    /// The signed delta has the magnitude of the quantity and the sign of the
    /// direction.
    #[test]
    fn prop_signed_delta_sign_and_magnitude(
        direction in direction_strategy(),
        quantity in positive_quantity(),
    ) {
        let delta = signed_delta(direction, quantity);
        prop_assert_eq!(delta.abs(), quantity);
        match direction {
            MovementDirection::In => prop_assert!(delta > Decimal::ZERO),
            MovementDirection::Out => prop_assert!(delta < Decimal::ZERO),
        }
    }

    /// A reversing entry exactly undoes its original: appending both to any
    /// history leaves the recomputed stock unchanged.
    #[test]
    fn prop_reversal_is_neutral(
        history in proptest::collection::vec(
            (direction_strategy(), positive_quantity()),
            0..20,
        ),
        direction in direction_strategy(),
        quantity in positive_quantity(),
    ) {
        let baseline = recompute_stock(history.clone());

        let entry = reversing_entry(Uuid::new_v4(), direction, quantity);
        let mut extended = history;
        extended.push((direction, quantity));
        extended.push((entry.direction, entry.quantity));

        prop_assert_eq!(recompute_stock(extended), baseline);
    }

    /// Recomputed stock equals the sum of signed deltas in any order.
    #[test]
    fn prop_recompute_is_order_independent(
        mut history in proptest::collection::vec(
            (direction_strategy(), positive_quantity()),
            0..20,
        ),
    ) {
        let forward = recompute_stock(history.clone());
        history.reverse();
        prop_assert_eq!(recompute_stock(history), forward);
    }
}
