//! Stock domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tsena_shared::types::{
    AreaId, EmployeeId, OrderLineId, ProductId, PurchaseLineId, SaleLineId, UserId,
};

/// Direction of a stock movement: into or out of the area's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Quantity enters the stock.
    In,
    /// Quantity leaves the stock.
    Out,
}

impl MovementDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    /// Sign applied to a quantity moving in this direction.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::In => Decimal::ONE,
            Self::Out => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Business operation behind a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementOperation {
    /// Delivery of a sale to a customer.
    Sale,
    /// Receipt of goods from a supplier.
    Supply,
    /// Manual correction of the stock level.
    Correction,
    /// Goods sent back to a supplier.
    ReturnSupplier,
    /// Goods returned by a customer.
    ReturnCustomer,
    /// Anything else: donation, breakage, theft, expiry.
    Other,
}

impl MovementOperation {
    /// Returns true if this operation may be recorded with the given
    /// direction.
    ///
    /// SUPPLY and RETURN_CUSTOMER only ever add stock; SALE and
    /// RETURN_SUPPLIER only ever remove it. CORRECTION and OTHER go both
    /// ways.
    #[must_use]
    pub const fn allows(self, direction: MovementDirection) -> bool {
        match self {
            Self::Supply | Self::ReturnCustomer => matches!(direction, MovementDirection::In),
            Self::Sale | Self::ReturnSupplier => matches!(direction, MovementDirection::Out),
            Self::Correction | Self::Other => true,
        }
    }
}

/// Product approval lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductState {
    /// Created, awaiting approval.
    Pending,
    /// Approved; participates in normal operations.
    Validated,
    /// Refused; eligible for the periodic purge.
    Rejected,
}

impl ProductState {
    /// Returns true if the product may be removed by the purge.
    #[must_use]
    pub const fn is_purgeable(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Back-reference to the document detail line that triggered a movement.
///
/// A movement carries at most one of these; the detail-line id doubles as the
/// idempotency key for delivery triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedDetail {
    /// Sale detail line (delivery to a customer).
    Sale(SaleLineId),
    /// Purchase request detail line (receipt from a supplier).
    Purchase(PurchaseLineId),
    /// Customer order detail line.
    Order(OrderLineId),
}

/// Input for recording a new stock movement.
#[derive(Debug, Clone)]
pub struct NewMovement {
    /// The product whose stock changes.
    pub product_id: ProductId,
    /// The area the movement belongs to.
    pub area_id: AreaId,
    /// Movement direction.
    pub direction: MovementDirection,
    /// Business operation.
    pub operation: MovementOperation,
    /// Quantity moved; must be strictly positive.
    pub quantity: Decimal,
    /// Business date of the movement.
    pub date_of: NaiveDate,
    /// Optional free-text reason.
    pub comment: Option<String>,
    /// Employee who initiated the movement.
    pub initiated_by: EmployeeId,
    /// User who recorded the movement.
    pub created_by: UserId,
    /// Document detail line that triggered the movement, if any.
    pub linked_detail: Option<LinkedDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_opposite_direction() {
        assert_eq!(MovementDirection::In.opposite(), MovementDirection::Out);
        assert_eq!(MovementDirection::Out.opposite(), MovementDirection::In);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(MovementDirection::In.sign(), Decimal::ONE);
        assert_eq!(MovementDirection::Out.sign(), Decimal::NEGATIVE_ONE);
    }

    #[rstest]
    #[case(MovementOperation::Supply, MovementDirection::In, true)]
    #[case(MovementOperation::Supply, MovementDirection::Out, false)]
    #[case(MovementOperation::ReturnCustomer, MovementDirection::In, true)]
    #[case(MovementOperation::ReturnCustomer, MovementDirection::Out, false)]
    #[case(MovementOperation::Sale, MovementDirection::Out, true)]
    #[case(MovementOperation::Sale, MovementDirection::In, false)]
    #[case(MovementOperation::ReturnSupplier, MovementDirection::Out, true)]
    #[case(MovementOperation::ReturnSupplier, MovementDirection::In, false)]
    #[case(MovementOperation::Correction, MovementDirection::In, true)]
    #[case(MovementOperation::Correction, MovementDirection::Out, true)]
    #[case(MovementOperation::Other, MovementDirection::In, true)]
    #[case(MovementOperation::Other, MovementDirection::Out, true)]
    fn test_coherence_table(
        #[case] operation: MovementOperation,
        #[case] direction: MovementDirection,
        #[case] allowed: bool,
    ) {
        assert_eq!(operation.allows(direction), allowed);
    }

    #[test]
    fn test_only_rejected_products_are_purgeable() {
        assert!(ProductState::Rejected.is_purgeable());
        assert!(!ProductState::Pending.is_purgeable());
        assert!(!ProductState::Validated.is_purgeable());
    }
}
