//! Cash domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tsena_shared::types::DenominationId;

/// Direction of a cash transaction: money into or out of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Money enters the register.
    In,
    /// Money leaves the register.
    Out,
}

impl TransactionDirection {
    /// Sign applied to an amount moving in this direction.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::In => Decimal::ONE,
            Self::Out => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Business purpose of a cash transaction.
///
/// Corrections and miscellaneous expenses are split into IN/OUT variants so
/// every operation maps to exactly one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashOperation {
    /// Customer payment for a sale.
    SalePayment,
    /// Cash deposited to replenish the register.
    Supply,
    /// Correction adding money (e.g. returned change float).
    CorrectionIn,
    /// Correction removing money.
    CorrectionOut,
    /// Cash taken to the bank.
    BankTransfer,
    /// Miscellaneous inflow.
    MiscExpenseIn,
    /// Miscellaneous outflow (petty expense).
    MiscExpenseOut,
}

impl CashOperation {
    /// The single direction this operation is allowed to use.
    #[must_use]
    pub const fn direction(self) -> TransactionDirection {
        match self {
            Self::SalePayment | Self::Supply | Self::CorrectionIn | Self::MiscExpenseIn => {
                TransactionDirection::In
            }
            Self::BankTransfer | Self::CorrectionOut | Self::MiscExpenseOut => {
                TransactionDirection::Out
            }
        }
    }

    /// Returns true if this operation may be recorded with the given
    /// direction.
    #[must_use]
    pub fn allows(self, direction: TransactionDirection) -> bool {
        self.direction() == direction
    }
}

/// Transaction settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded, not yet progressed.
    Pending,
    /// Acknowledged and in flight (e.g. awaiting the register).
    Opened,
    /// Evidence received (receipt, bank statement line).
    Finalized,
    /// Money confirmed; counts toward the theoretical balance.
    Completed,
    /// Partially settled.
    Partial,
    /// Closed; no further updates or rejection possible.
    Closed,
    /// Canceled; retained for audit.
    Canceled,
    /// Rejected.
    Rejected,
    /// Failed (e.g. bounced check).
    Failed,
}

impl TransactionStatus {
    /// Returns true if the transaction counts toward the theoretical balance.
    #[must_use]
    pub const fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if no plain status update may leave this state.
    ///
    /// COMPLETED is immutable except through the explicit cancel action.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Closed | Self::Canceled | Self::Rejected | Self::Failed
        )
    }
}

/// Cash register lifecycle within a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashAccountState {
    /// Accepting transactions.
    Open,
    /// Terminal; blocks all further transactions.
    Closed,
    /// Counted amount matched the theoretical balance.
    Balanced,
    /// Counted amount differed; discrepancy recorded, unresolved.
    NotBalanced,
    /// Supervisor accepted a discrepancy.
    BalancedForced,
}

impl CashAccountState {
    /// Returns true if new transactions may be recorded on the account.
    #[must_use]
    pub const fn accepts_transactions(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true if a balancing action may run from this state.
    ///
    /// NOT_BALANCED may be re-balanced until the discrepancy is resolved or
    /// force-accepted.
    #[must_use]
    pub const fn can_balance(self) -> bool {
        matches!(self, Self::Open | Self::NotBalanced)
    }

    /// Returns true if the account may be closed from this state.
    #[must_use]
    pub const fn can_close(self) -> bool {
        matches!(self, Self::Balanced | Self::BalancedForced)
    }
}

/// Reason a cash adjustment was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Opening float count at the start of the day.
    Opening,
    /// End-of-period reconciliation count.
    Balancing,
    /// Supervisor override accepting a discrepancy.
    ForcingBalance,
}

/// One denomination line: how many pieces of a given note or coin.
///
/// Carries the denomination's value so totals can be computed without I/O;
/// the repository resolves `denomination_id` to `value` when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenominationLine {
    /// The denomination being counted.
    pub denomination_id: DenominationId,
    /// Face value of one piece.
    pub value: Decimal,
    /// Number of pieces; must be strictly positive.
    pub quantity: i32,
}

impl DenominationLine {
    /// Amount contributed by this line.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(CashOperation::SalePayment, TransactionDirection::In)]
    #[case(CashOperation::Supply, TransactionDirection::In)]
    #[case(CashOperation::CorrectionIn, TransactionDirection::In)]
    #[case(CashOperation::MiscExpenseIn, TransactionDirection::In)]
    #[case(CashOperation::BankTransfer, TransactionDirection::Out)]
    #[case(CashOperation::CorrectionOut, TransactionDirection::Out)]
    #[case(CashOperation::MiscExpenseOut, TransactionDirection::Out)]
    fn test_operation_partition(
        #[case] operation: CashOperation,
        #[case] expected: TransactionDirection,
    ) {
        assert_eq!(operation.direction(), expected);
        assert!(operation.allows(expected));
        let other = match expected {
            TransactionDirection::In => TransactionDirection::Out,
            TransactionDirection::Out => TransactionDirection::In,
        };
        assert!(!operation.allows(other));
    }

    #[test]
    fn test_only_completed_counts_toward_balance() {
        assert!(TransactionStatus::Completed.counts_toward_balance());
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Opened,
            TransactionStatus::Finalized,
            TransactionStatus::Partial,
            TransactionStatus::Closed,
            TransactionStatus::Canceled,
            TransactionStatus::Rejected,
            TransactionStatus::Failed,
        ] {
            assert!(!status.counts_toward_balance());
        }
    }

    #[test]
    fn test_account_state_predicates() {
        assert!(CashAccountState::Open.accepts_transactions());
        assert!(!CashAccountState::Closed.accepts_transactions());
        assert!(!CashAccountState::Balanced.accepts_transactions());

        assert!(CashAccountState::Open.can_balance());
        assert!(CashAccountState::NotBalanced.can_balance());
        assert!(!CashAccountState::Closed.can_balance());
        assert!(!CashAccountState::Balanced.can_balance());

        assert!(CashAccountState::Balanced.can_close());
        assert!(CashAccountState::BalancedForced.can_close());
        assert!(!CashAccountState::NotBalanced.can_close());
        assert!(!CashAccountState::Open.can_close());
    }

    #[test]
    fn test_denomination_line_amount() {
        let line = DenominationLine {
            denomination_id: DenominationId::new(),
            value: dec!(20000),
            quantity: 5,
        };
        assert_eq!(line.amount(), dec!(100000));
    }
}
