//! Checkout and order history. Read-mostly; only checkout touches the
//! cart snapshot (the server consumes the cart when the order is built).

use tracing::{instrument, warn};

use ecom_market_core::OrderId;

use crate::api::ApiError;
use crate::api::types::{
    OrderCanceledPayload, OrderCreatedPayload, OrderDraft, OrderListPayload, OrderPayload,
};
use crate::messages;

use super::StoreSession;

impl StoreSession {
    /// Create an order from the current server cart. On success the cart
    /// snapshot is reset and re-fetched (the server has emptied it) and
    /// an info notice carries the order number.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the cart is empty or the form
    /// is invalid, or another error if the request fails.
    #[instrument(skip(self, draft))]
    pub async fn checkout(&self, draft: &OrderDraft) -> Result<OrderCreatedPayload, ApiError> {
        match self.inner.api.create_order(draft).await {
            Ok(created) => {
                self.lock().cart.reset();
                self.push_info(format!(
                    "{} {}",
                    messages::ORDER_CREATED,
                    created.order_number
                ));
                if let Err(e) = self.load_cart().await {
                    warn!("Cart fetch after checkout failed: {e}");
                }
                Ok(created)
            }
            Err(e) => {
                self.report_failure(&e, messages::ORDER_CREATE_FAILED);
                Err(e)
            }
        }
    }

    /// List the user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn orders(&self) -> Result<OrderListPayload, ApiError> {
        self.inner.api.orders().await
    }

    /// Get one order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    pub async fn order(&self, order_id: OrderId) -> Result<OrderPayload, ApiError> {
        self.inner.api.order(order_id).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the order is no longer
    /// cancelable, or another error if the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<OrderCanceledPayload, ApiError> {
        match self.inner.api.cancel_order(order_id).await {
            Ok(canceled) => Ok(canceled),
            Err(e) => {
                self.report_failure(&e, messages::ORDER_CANCEL_FAILED);
                Err(e)
            }
        }
    }
}
