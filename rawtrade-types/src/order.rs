use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::primitives::{Address, MaterialId, OrderId, Timestamp};

/// Order lifecycle as enforced by the contract:
/// Pending → Matched → Completed, or Pending → Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderStatus {
    Pending = 0,
    Matched = 1,
    Completed = 2,
    Cancelled = 3,
}

/// Action a buyer can take on one of their own orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderAction {
    Cancel,
    Confirm,
}

impl OrderStatus {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Matched => "Matched",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed and cancelled orders accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Actions offered to the buyer for an order in this status.
    pub fn available_actions(self) -> &'static [OrderAction] {
        match self {
            OrderStatus::Pending => &[OrderAction::Cancel],
            OrderStatus::Matched => &[OrderAction::Confirm],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::Pending),
            1 => Ok(OrderStatus::Matched),
            2 => Ok(OrderStatus::Completed),
            3 => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::UnknownOrderStatus(other)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::Cancel => f.write_str("cancel-order"),
            OrderAction::Confirm => f.write_str("confirm-trade"),
        }
    }
}

/// A buyer order as reported by `getOrderInfo`.
///
/// The contract uses `0` for "not matched yet" and the zero address for "no
/// supplier"; both are mapped to `None` here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer: Address,
    pub material_id: MaterialId,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub matched_at: Option<Timestamp>,
    pub matched_supplier: Option<Address>,
    pub delivery_location: String,
}

impl Order {
    pub fn available_actions(&self) -> &'static [OrderAction] {
        self.status.available_actions()
    }
}

/// Arguments of a `placeOrder` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub material_id: MaterialId,
    pub quantity: u32,
    pub max_price: u64,
    pub delivery_location: String,
    /// Free text; only the first 31 characters reach the contract.
    pub special_requirements: String,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.delivery_location.trim().is_empty() {
            return Err(DomainError::MissingField("delivery location"));
        }
        Ok(())
    }
}

/// Match record for an order, as reported by `getTradeMatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeMatch {
    pub order_id: OrderId,
    pub material_id: MaterialId,
    pub buyer: Address,
    pub supplier: Address,
    pub timestamp: Timestamp,
    pub is_confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::U256;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: U256::from(1u64),
            buyer: Address::repeat_byte(0xbb),
            material_id: U256::from(4u64),
            status,
            created_at: 1_700_000_000,
            matched_at: None,
            matched_supplier: None,
            delivery_location: "Hamburg".to_string(),
        }
    }

    #[test]
    fn test_pending_offers_cancel_only() {
        assert_eq!(order(OrderStatus::Pending).available_actions(), &[OrderAction::Cancel]);
    }

    #[test]
    fn test_matched_offers_confirm_only() {
        assert_eq!(order(OrderStatus::Matched).available_actions(), &[OrderAction::Confirm]);
    }

    #[test]
    fn test_terminal_states_offer_nothing() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(order(status).available_actions().is_empty());
        }
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Matched.is_terminal());
    }

    #[test]
    fn test_status_from_u8() {
        assert_eq!(OrderStatus::try_from(0).unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::try_from(3).unwrap(), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::try_from(4), Err(DomainError::UnknownOrderStatus(4)));
    }

    #[test]
    fn test_order_request_requires_location() {
        let request = OrderRequest {
            material_id: U256::from(1u64),
            quantity: 1,
            max_price: 1,
            delivery_location: " ".to_string(),
            special_requirements: String::new(),
        };
        assert_eq!(
            request.validate(),
            Err(DomainError::MissingField("delivery location"))
        );
    }
}
