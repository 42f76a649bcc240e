//! Register balancing: counted cash versus theoretical balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::CashAccountState;

/// Result of comparing a physical count against the theoretical balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum BalancingOutcome {
    /// Counted amount matched exactly.
    Balanced,
    /// Counted amount differed; the discrepancy stays unresolved.
    NotBalanced {
        /// `counted - theoretical`.
        discrepancy: Decimal,
    },
    /// Supervisor override accepted the discrepancy.
    BalancedForced {
        /// `counted - theoretical`, kept for audit.
        discrepancy: Decimal,
    },
}

impl BalancingOutcome {
    /// The account state this outcome maps to.
    #[must_use]
    pub const fn account_state(self) -> CashAccountState {
        match self {
            Self::Balanced => CashAccountState::Balanced,
            Self::NotBalanced { .. } => CashAccountState::NotBalanced,
            Self::BalancedForced { .. } => CashAccountState::BalancedForced,
        }
    }

    /// `counted - theoretical` for this outcome.
    #[must_use]
    pub const fn discrepancy(self) -> Decimal {
        match self {
            Self::Balanced => Decimal::ZERO,
            Self::NotBalanced { discrepancy } | Self::BalancedForced { discrepancy } => discrepancy,
        }
    }
}

/// Decides the balancing outcome.
///
/// A forced balance is always permitted regardless of discrepancy size, but
/// carries the discrepancy so it can be logged for audit. Without the forced
/// flag, any non-zero discrepancy leaves the register NOT_BALANCED.
#[must_use]
pub fn balancing_outcome(counted: Decimal, theoretical: Decimal, forced: bool) -> BalancingOutcome {
    let discrepancy = counted - theoretical;
    if forced {
        BalancingOutcome::BalancedForced { discrepancy }
    } else if discrepancy.is_zero() {
        BalancingOutcome::Balanced
    } else {
        BalancingOutcome::NotBalanced { discrepancy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_count_balances() {
        let outcome = balancing_outcome(dec!(150000), dec!(150000), false);
        assert_eq!(outcome, BalancingOutcome::Balanced);
        assert_eq!(outcome.account_state(), CashAccountState::Balanced);
        assert_eq!(outcome.discrepancy(), Decimal::ZERO);
    }

    #[test]
    fn test_shortfall_is_not_balanced() {
        let outcome = balancing_outcome(dec!(148000), dec!(150000), false);
        assert_eq!(
            outcome,
            BalancingOutcome::NotBalanced {
                discrepancy: dec!(-2000)
            }
        );
        assert_eq!(outcome.account_state(), CashAccountState::NotBalanced);
    }

    #[test]
    fn test_surplus_is_not_balanced() {
        let outcome = balancing_outcome(dec!(151000), dec!(150000), false);
        assert_eq!(
            outcome,
            BalancingOutcome::NotBalanced {
                discrepancy: dec!(1000)
            }
        );
    }

    #[test]
    fn test_forced_balance_accepts_any_discrepancy() {
        let outcome = balancing_outcome(dec!(148000), dec!(150000), true);
        assert_eq!(
            outcome,
            BalancingOutcome::BalancedForced {
                discrepancy: dec!(-2000)
            }
        );
        assert_eq!(outcome.account_state(), CashAccountState::BalancedForced);
        assert_eq!(outcome.discrepancy(), dec!(-2000));
    }

    #[test]
    fn test_forced_balance_with_exact_count() {
        let outcome = balancing_outcome(dec!(150000), dec!(150000), true);
        assert_eq!(
            outcome,
            BalancingOutcome::BalancedForced {
                discrepancy: Decimal::ZERO
            }
        );
    }
}
