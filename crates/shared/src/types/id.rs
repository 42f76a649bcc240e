//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProductId` where a
//! `CashAccountId` is expected. IDs are UUIDv4: areas are independent tenants,
//! so keys must be unique without cross-area coordination.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(AreaId, "Unique identifier for an area (point of sale).");
typed_id!(UserId, "Unique identifier for a user account.");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(PriceHistoryId, "Unique identifier for a price history entry.");
typed_id!(MovementId, "Unique identifier for a stock movement.");
typed_id!(DenominationId, "Unique identifier for a cash denomination.");
typed_id!(CashAccountId, "Unique identifier for a cash account.");
typed_id!(CashTransactionId, "Unique identifier for a cash transaction.");
typed_id!(AdjustmentId, "Unique identifier for a cash adjustment.");
typed_id!(InvoiceId, "Unique identifier for an invoice.");
typed_id!(InvoiceLineId, "Unique identifier for an invoice detail line.");
typed_id!(SaleId, "Unique identifier for a sale.");
typed_id!(SaleLineId, "Unique identifier for a sale detail line.");
typed_id!(PurchaseId, "Unique identifier for a purchase request.");
typed_id!(PurchaseLineId, "Unique identifier for a purchase detail line.");
typed_id!(OrderId, "Unique identifier for a customer order.");
typed_id!(OrderLineId, "Unique identifier for an order detail line.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ProductId::new(), ProductId::new());
    }

    #[test]
    fn test_roundtrip_through_string() {
        let id = MovementId::new();
        let parsed = MovementId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        assert_eq!(CashAccountId::from_uuid(uuid).into_inner(), uuid);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = InvoiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
