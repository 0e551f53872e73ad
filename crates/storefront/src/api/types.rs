//! Payload types for the Ecom Market store API.
//!
//! These types mirror the JSON the store serves. Required fields are
//! non-optional on purpose: a payload missing one fails decode at the
//! client boundary instead of leaking a half-formed value into the
//! snapshot layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use ecom_market_core::{
    BrandId, CartItemId, CategoryId, Email, MediaId, OrderId, OrderStatus, Price, ProductId,
    UserId,
};

use super::ApiError;

// =============================================================================
// Catalog Types
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

/// A product brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    /// Brand ID.
    pub id: BrandId,
    /// Display name.
    pub name: String,
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    /// Media ID.
    pub id: MediaId,
    /// Image URL (relative to the store's media root).
    pub url: String,
    /// Whether this is the product's main image.
    #[serde(default)]
    pub is_main: bool,
}

/// Denormalized product snapshot used in lists, cart rows, and favorites.
///
/// This is the read-only product reference the UI renders next to a cart
/// line; it is captured at listing time and never re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current catalog price.
    pub price: Price,
    /// Main image URL, if the product has images.
    pub main_image: Option<String>,
    /// Manufacturer part number.
    pub part_number: String,
}

/// Full product detail for the product page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: Option<String>,
    /// Current catalog price.
    pub price: Price,
    /// Manufacturer part number.
    pub part_number: String,
    /// Owning category.
    pub category: Category,
    /// All product images.
    pub images: Vec<Media>,
}

impl ProductDetail {
    /// Collapse the detail into the denormalized snapshot used by cart and
    /// favorites operations.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        let main_image = self
            .images
            .iter()
            .find(|img| img.is_main)
            .or_else(|| self.images.first())
            .map(|img| img.url.clone());

        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            main_image,
            part_number: self.part_number.clone(),
        }
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// A cart line as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntryPayload {
    /// Cart line ID.
    pub id: CartItemId,
    /// Product ID (unique across the cart).
    pub product_id: ProductId,
    /// Quantity, always >= 1 (removal is a distinct operation).
    pub quantity: u32,
    /// Price captured when the item was added; not re-priced.
    pub price_at_addition: Price,
    /// Denormalized product snapshot.
    pub product: ProductSummary,
}

/// The full cart as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPayload {
    /// Cart lines in server order.
    pub items: Vec<CartEntryPayload>,
    /// Total number of items across all lines.
    pub total_items: u32,
    /// Total price across all lines.
    pub total_price: Price,
}

impl CartPayload {
    /// Validate the cart invariants before the payload reaches the
    /// snapshot layer: every quantity >= 1 and at most one line per
    /// product id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] when an invariant is violated.
    pub fn validate(self) -> Result<Self, ApiError> {
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if item.quantity == 0 {
                return Err(ApiError::InvalidPayload(format!(
                    "cart line for product {} has zero quantity",
                    item.product_id
                )));
            }
            if !seen.insert(item.product_id) {
                return Err(ApiError::InvalidPayload(format!(
                    "duplicate cart line for product {}",
                    item.product_id
                )));
            }
        }
        Ok(self)
    }
}

/// Body for adding a product to the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemCreate {
    /// Product to add.
    pub product_id: ProductId,
    /// Quantity to add.
    pub quantity: u32,
}

/// Body for changing a cart line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemUpdate {
    /// New quantity (>= 1; removal is a separate call).
    pub quantity: u32,
}

// =============================================================================
// Favorites Types
// =============================================================================

/// A favorites entry as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteEntryPayload {
    /// Product ID (unique across the favorites list).
    pub product_id: ProductId,
    /// Denormalized product snapshot.
    pub product: ProductSummary,
}

/// The full favorites list as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesPayload {
    /// Entries in insertion order.
    pub items: Vec<FavoriteEntryPayload>,
}

impl FavoritesPayload {
    /// Validate favorites uniqueness before the payload reaches the
    /// snapshot layer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] when a product id repeats.
    pub fn validate(self) -> Result<Self, ApiError> {
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.product_id) {
                return Err(ApiError::InvalidPayload(format!(
                    "duplicate favorites entry for product {}",
                    item.product_id
                )));
            }
        }
        Ok(self)
    }
}

/// Body for adding a product to favorites.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteItemCreate {
    /// Product to add.
    pub product_id: ProductId,
}

/// Plain acknowledgement payload (`{"message": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    /// Human-readable server message.
    pub message: String,
}

// =============================================================================
// Auth Types
// =============================================================================

/// The authenticated user, as `GET /users/me` returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Account email.
    pub email: Email,
    /// First name.
    pub first_name: String,
    /// Contact phone.
    pub phone: String,
    /// Last name, if provided.
    #[serde(default)]
    pub last_name: Option<String>,
    /// City, if provided.
    #[serde(default)]
    pub city: Option<String>,
}

/// Body for registering a new account.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: Email,
    /// Password (forwarded to the server, never stored locally).
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Contact phone.
    pub phone: String,
}

// =============================================================================
// Order Types
// =============================================================================

/// Shipping form submitted at checkout. The server builds the order from
/// the current cart contents.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Delivery city.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Street address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Optional delivery notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response after creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreatedPayload {
    /// Created order ID.
    pub order_id: OrderId,
    /// Human-facing order number (e.g., `OR2500001`).
    pub order_number: String,
    /// Total order price.
    pub total_price: Price,
}

/// An order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemPayload {
    /// Product ID.
    pub product_id: ProductId,
    /// Quantity purchased.
    pub quantity: u32,
    /// Price captured at purchase time.
    pub price_at_purchase: Price,
    /// Product name captured at purchase time.
    pub product_name: String,
}

/// A full order with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Order ID.
    pub id: OrderId,
    /// Human-facing order number.
    pub order_number: String,
    /// Current status.
    pub status: OrderStatus,
    /// Total number of items.
    pub total_items: u32,
    /// Total price.
    pub total_price: Price,
    /// Order lines.
    pub items: Vec<OrderItemPayload>,
    /// Creation timestamp (server local time, no timezone).
    pub created_at: NaiveDateTime,
}

/// A brief order row for the order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummaryPayload {
    /// Order ID.
    pub id: OrderId,
    /// Human-facing order number.
    pub order_number: String,
    /// Current status.
    pub status: OrderStatus,
    /// Total number of items.
    pub total_items: u32,
    /// Total price.
    pub total_price: Price,
    /// Creation timestamp (server local time, no timezone).
    pub created_at: NaiveDateTime,
}

/// The order list with its total count.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListPayload {
    /// Order rows, newest first.
    pub orders: Vec<OrderSummaryPayload>,
    /// Total number of orders for the user.
    pub total: u32,
}

/// Response after canceling an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCanceledPayload {
    /// Canceled order ID.
    pub order_id: OrderId,
    /// Status after cancellation.
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_kopecks(10_000),
            main_image: None,
            part_number: format!("PN-{id:05}"),
        }
    }

    fn entry(id: i32, quantity: u32) -> CartEntryPayload {
        CartEntryPayload {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            quantity,
            price_at_addition: Price::from_kopecks(10_000),
            product: summary(id),
        }
    }

    #[test]
    fn test_cart_validate_ok() {
        let cart = CartPayload {
            items: vec![entry(1, 2), entry(2, 1)],
            total_items: 3,
            total_price: Price::from_kopecks(30_000),
        };
        assert!(cart.validate().is_ok());
    }

    #[test]
    fn test_cart_validate_rejects_zero_quantity() {
        let cart = CartPayload {
            items: vec![entry(1, 0)],
            total_items: 0,
            total_price: Price::ZERO,
        };
        let err = cart.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidPayload(_)));
    }

    #[test]
    fn test_cart_validate_rejects_duplicate_product() {
        let cart = CartPayload {
            items: vec![entry(1, 1), entry(1, 2)],
            total_items: 3,
            total_price: Price::from_kopecks(30_000),
        };
        let err = cart.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidPayload(_)));
    }

    #[test]
    fn test_favorites_validate_rejects_duplicates() {
        let favorites = FavoritesPayload {
            items: vec![
                FavoriteEntryPayload {
                    product_id: ProductId::new(1),
                    product: summary(1),
                },
                FavoriteEntryPayload {
                    product_id: ProductId::new(1),
                    product: summary(1),
                },
            ],
        };
        assert!(matches!(
            favorites.validate(),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_product_detail_summary_prefers_main_image() {
        let detail = ProductDetail {
            id: ProductId::new(1),
            name: "Brake pad".to_owned(),
            description: None,
            price: Price::from_kopecks(450_000),
            part_number: "BP-1190".to_owned(),
            category: Category {
                id: CategoryId::new(1),
                name: "Brakes".to_owned(),
            },
            images: vec![
                Media {
                    id: MediaId::new(1),
                    url: "/media/1.jpg".to_owned(),
                    is_main: false,
                },
                Media {
                    id: MediaId::new(2),
                    url: "/media/2.jpg".to_owned(),
                    is_main: true,
                },
            ],
        };
        assert_eq!(detail.summary().main_image.as_deref(), Some("/media/2.jpg"));
    }

    #[test]
    fn test_order_decodes_server_local_timestamp() {
        // The store serializes timestamps without a timezone suffix.
        let order: OrderPayload = serde_json::from_str(
            r#"{"id": 1, "order_number": "OR2500001", "status": "created",
                "total_items": 3, "total_price": 15999.5, "items": [],
                "created_at": "2025-01-15T10:30:00"}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert!(order.status.is_cancelable());
        assert_eq!(order.created_at.to_string(), "2025-01-15 10:30:00");
    }

    #[test]
    fn test_strict_decode_rejects_missing_field() {
        // quantity is required; a payload without it must not decode
        let result = serde_json::from_str::<CartEntryPayload>(
            r#"{"id": 1, "product_id": 1, "price_at_addition": 100.0,
                "product": {"id": 1, "name": "x", "price": 100.0,
                            "main_image": null, "part_number": "PN-1"}}"#,
        );
        assert!(result.is_err());
    }
}
