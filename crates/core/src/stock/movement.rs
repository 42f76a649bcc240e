//! Movement validation, deltas, and the cancellation policy.
//!
//! All functions here are pure: the repository calls them before touching the
//! database, so a rejected movement never reaches a write.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::StockError;
use super::types::{MovementDirection, MovementOperation};

/// Validates a movement before it is persisted.
///
/// Checks the direction/operation coherence table and that the quantity is
/// strictly positive. Quantities are always positive at rest; the sign is
/// derived from the direction.
///
/// # Errors
///
/// Returns `InvalidOperationDirection` or `NonPositiveQuantity`.
pub fn validate_movement(
    direction: MovementDirection,
    operation: MovementOperation,
    quantity: Decimal,
) -> Result<(), StockError> {
    if !operation.allows(direction) {
        return Err(StockError::InvalidOperationDirection {
            operation,
            direction,
        });
    }
    if quantity <= Decimal::ZERO {
        return Err(StockError::NonPositiveQuantity);
    }
    Ok(())
}

/// Signed stock delta of a movement: `+quantity` for IN, `-quantity` for OUT.
#[must_use]
pub fn signed_delta(direction: MovementDirection, quantity: Decimal) -> Decimal {
    direction.sign() * quantity
}

/// Checks whether a movement may still be canceled.
///
/// Cancellation is only permitted on the business date the ledger entry was
/// recorded; older movements must be compensated with an opposite movement so
/// closed days stay untouched. A movement can be reversed at most once.
///
/// # Errors
///
/// Returns `AlreadyReversed` or `StaleMovementCancellation`.
pub fn check_cancelable(
    movement_id: Uuid,
    created_at: DateTime<Utc>,
    already_reversed: bool,
    today: NaiveDate,
) -> Result<(), StockError> {
    if already_reversed {
        return Err(StockError::AlreadyReversed(movement_id));
    }
    let created_on = created_at.date_naive();
    if created_on != today {
        return Err(StockError::StaleMovementCancellation { created_on, today });
    }
    Ok(())
}

/// A reversing ledger entry built from the movement being canceled.
///
/// The original row is retained; this entry undoes its effect. The operation
/// is always CORRECTION so the flipped direction stays coherent regardless of
/// what the original operation was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversingEntry {
    /// Opposite of the original direction.
    pub direction: MovementDirection,
    /// Always `Correction`.
    pub operation: MovementOperation,
    /// Same quantity as the original.
    pub quantity: Decimal,
    /// The movement being reversed.
    pub reverses: Uuid,
    /// Audit comment referencing the original entry.
    pub comment: String,
}

/// Builds the reversing entry for a canceled movement.
#[must_use]
pub fn reversing_entry(
    original_id: Uuid,
    original_direction: MovementDirection,
    quantity: Decimal,
) -> ReversingEntry {
    ReversingEntry {
        direction: original_direction.opposite(),
        operation: MovementOperation::Correction,
        quantity,
        reverses: original_id,
        comment: format!("Reversal of movement {original_id}"),
    }
}

/// Recomputes a stock level from full movement history.
///
/// The cached `actual_stock` is a materialized projection of the ledger; this
/// is the repair/verification routine that derives it from scratch.
#[must_use]
pub fn recompute_stock<I>(movements: I) -> Decimal
where
    I: IntoIterator<Item = (MovementDirection, Decimal)>,
{
    movements
        .into_iter()
        .map(|(direction, quantity)| signed_delta(direction, quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 14, 30, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sale_in_is_rejected() {
        let result = validate_movement(
            MovementDirection::In,
            MovementOperation::Sale,
            dec!(10),
        );
        assert!(matches!(
            result,
            Err(StockError::InvalidOperationDirection { .. })
        ));
    }

    #[test]
    fn test_supply_out_is_rejected() {
        let result = validate_movement(
            MovementDirection::Out,
            MovementOperation::Supply,
            dec!(10),
        );
        assert!(matches!(
            result,
            Err(StockError::InvalidOperationDirection { .. })
        ));
    }

    #[test]
    fn test_correction_goes_both_ways() {
        for direction in [MovementDirection::In, MovementDirection::Out] {
            assert!(validate_movement(direction, MovementOperation::Correction, dec!(1)).is_ok());
        }
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        for quantity in [Decimal::ZERO, dec!(-4)] {
            assert!(matches!(
                validate_movement(MovementDirection::In, MovementOperation::Supply, quantity),
                Err(StockError::NonPositiveQuantity)
            ));
        }
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(MovementDirection::In, dec!(100)), dec!(100));
        assert_eq!(signed_delta(MovementDirection::Out, dec!(30)), dec!(-30));
    }

    #[test]
    fn test_cancel_same_day_allowed() {
        let id = Uuid::new_v4();
        assert!(check_cancelable(id, ts(2026, 3, 2), false, day(2026, 3, 2)).is_ok());
    }

    #[test]
    fn test_cancel_prior_day_is_stale() {
        let id = Uuid::new_v4();
        let result = check_cancelable(id, ts(2026, 3, 1), false, day(2026, 3, 2));
        assert!(matches!(
            result,
            Err(StockError::StaleMovementCancellation { .. })
        ));
    }

    #[test]
    fn test_cancel_twice_rejected() {
        let id = Uuid::new_v4();
        let result = check_cancelable(id, ts(2026, 3, 2), true, day(2026, 3, 2));
        assert!(matches!(result, Err(StockError::AlreadyReversed(found)) if found == id));
    }

    #[test]
    fn test_reversing_entry_flips_direction() {
        let id = Uuid::new_v4();
        let entry = reversing_entry(id, MovementDirection::Out, dec!(30));
        assert_eq!(entry.direction, MovementDirection::In);
        assert_eq!(entry.operation, MovementOperation::Correction);
        assert_eq!(entry.quantity, dec!(30));
        assert_eq!(entry.reverses, id);
        assert!(entry.comment.contains(&id.to_string()));
    }

    #[test]
    fn test_reversal_cancels_out_in_recompute() {
        let id = Uuid::new_v4();
        let entry = reversing_entry(id, MovementDirection::In, dec!(25));
        let stock = recompute_stock(vec![
            (MovementDirection::In, dec!(25)),
            (entry.direction, entry.quantity),
        ]);
        assert_eq!(stock, Decimal::ZERO);
    }

    #[test]
    fn test_recompute_supply_then_sale() {
        let stock = recompute_stock(vec![
            (MovementDirection::In, dec!(100)),
            (MovementDirection::Out, dec!(30)),
        ]);
        assert_eq!(stock, dec!(70));
    }

    #[test]
    fn test_recompute_empty_history_is_zero() {
        assert_eq!(recompute_stock(Vec::new()), Decimal::ZERO);
    }
}
