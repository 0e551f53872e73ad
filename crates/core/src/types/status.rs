//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Mirrors the status values the store API serializes in order payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, awaiting confirmation.
    #[default]
    Created,
    /// Order confirmed by the store.
    Confirmed,
    /// Order handed to the delivery service.
    Shipped,
    /// Order delivered to the customer.
    Delivered,
    /// Order canceled (by the customer or the store).
    Canceled,
}

impl OrderStatus {
    /// Whether the customer may still cancel an order in this status.
    ///
    /// Orders stop being cancelable once they ship.
    #[must_use]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::Created | Self::Confirmed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cancelable() {
        assert!(OrderStatus::Created.is_cancelable());
        assert!(OrderStatus::Confirmed.is_cancelable());
        assert!(!OrderStatus::Shipped.is_cancelable());
        assert!(!OrderStatus::Delivered.is_cancelable());
        assert!(!OrderStatus::Canceled.is_cancelable());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Created).unwrap();
        assert_eq!(json, "\"created\"");
        let status: OrderStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(status, OrderStatus::Canceled);
    }
}
