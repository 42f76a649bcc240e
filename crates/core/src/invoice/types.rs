//! Invoice domain types and derived totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the invoice is received from a supplier or sent to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Incoming invoice (supplier, from a purchase request).
    In,
    /// Outgoing invoice (customer, from an order).
    Out,
}

/// Invoice settlement status.
///
/// Same taxonomy as cash transactions; for invoices the gates of interest are
/// CLOSED (requires full payment) and REJECTED (requires no payment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, awaiting settlement.
    Pending,
    /// Acknowledged by the counterparty.
    Opened,
    /// Supporting documents complete.
    Finalized,
    /// Fully settled.
    Completed,
    /// Partially paid.
    Partial,
    /// Closed; immutable.
    Closed,
    /// Canceled.
    Canceled,
    /// Rejected; only possible while nothing was paid.
    Rejected,
    /// Failed.
    Failed,
}

impl InvoiceStatus {
    /// Returns true if payments may still be recorded.
    #[must_use]
    pub const fn accepts_payments(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Opened | Self::Finalized | Self::Partial
        )
    }
}

/// The amounts of one invoice detail line.
///
/// `quantity_real` is the delivered/received quantity; it stays `None` until
/// the delivery trigger confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceLineAmounts {
    /// Quantity originally requested.
    pub quantity_requested: Decimal,
    /// Quantity actually delivered or received, once confirmed.
    pub quantity_real: Option<Decimal>,
    /// Agreed price per unit.
    pub unit_price: Decimal,
}

impl InvoiceLineAmounts {
    /// Requested value of the line.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.quantity_requested * self.unit_price
    }

    /// Payable value of the line: zero until delivery is confirmed.
    #[must_use]
    pub fn amount_payable(&self) -> Decimal {
        self.quantity_real
            .map_or(Decimal::ZERO, |quantity| quantity * self.unit_price)
    }
}

/// Total requested value of the invoice.
#[must_use]
pub fn total_amount(lines: &[InvoiceLineAmounts]) -> Decimal {
    lines.iter().map(InvoiceLineAmounts::value).sum()
}

/// Amount actually owed: only lines whose delivery/receipt is confirmed
/// count.
#[must_use]
pub fn amount_to_pay(lines: &[InvoiceLineAmounts]) -> Decimal {
    lines.iter().map(InvoiceLineAmounts::amount_payable).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lines() -> Vec<InvoiceLineAmounts> {
        vec![
            InvoiceLineAmounts {
                quantity_requested: dec!(10),
                quantity_real: Some(dec!(8)),
                unit_price: dec!(50),
            },
            InvoiceLineAmounts {
                quantity_requested: dec!(4),
                quantity_real: None,
                unit_price: dec!(25),
            },
        ]
    }

    #[test]
    fn test_total_amount_counts_requested() {
        // 10 x 50 + 4 x 25
        assert_eq!(total_amount(&lines()), dec!(600));
    }

    #[test]
    fn test_amount_to_pay_counts_confirmed_only() {
        // 8 x 50; the undelivered line contributes nothing
        assert_eq!(amount_to_pay(&lines()), dec!(400));
    }

    #[test]
    fn test_empty_invoice_owes_nothing() {
        assert_eq!(total_amount(&[]), Decimal::ZERO);
        assert_eq!(amount_to_pay(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_accepts_payments() {
        assert!(InvoiceStatus::Pending.accepts_payments());
        assert!(InvoiceStatus::Partial.accepts_payments());
        assert!(!InvoiceStatus::Closed.accepts_payments());
        assert!(!InvoiceStatus::Rejected.accepts_payments());
        assert!(!InvoiceStatus::Canceled.accepts_payments());
    }
}
