//! Cart operations: optimistic apply, remote call, reconcile or roll back.

use tracing::instrument;

use ecom_market_core::ProductId;

use crate::api::ApiError;
use crate::api::types::ProductSummary;
use crate::messages;

use super::snapshot::CartItem;
use super::StoreSession;

impl StoreSession {
    /// Fetch the cart and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; the snapshot is left untouched.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) -> Result<(), ApiError> {
        let payload = self.inner.api.cart().await?;
        self.lock().cart.replace_from(payload);
        Ok(())
    }

    /// Add a product to the cart. The line appears (or its quantity grows)
    /// immediately; the server's answer reconciles the line or rolls it
    /// back.
    ///
    /// Returns whether the server confirmed the mutation. A zero quantity
    /// is rejected up front with no network call.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &ProductSummary, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }

        let previous = {
            let mut state = self.lock();
            let previous = state.cart.item(product.id).cloned();
            if previous.is_some() {
                state.cart.bump_quantity(product.id, quantity);
            } else {
                state.cart.push_item(CartItem {
                    product: product.clone(),
                    quantity,
                    price_at_addition: product.price,
                });
            }
            state.cart.set_updating(product.id, true);
            previous
        };

        let result = self.inner.api.add_cart_item(product.id, quantity).await;

        match result {
            Ok(entry) => {
                let mut state = self.lock();
                state.cart.set_updating(product.id, false);
                state.cart.reconcile_entry(&entry);
                true
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.cart.set_updating(product.id, false);
                    match previous {
                        Some(item) => state.cart.restore_item(item),
                        None => state.cart.remove(product.id),
                    }
                }
                self.report_failure(&e, messages::CART_ADD_FAILED);
                false
            }
        }
    }

    /// Set a cart line's quantity. The new quantity shows immediately; a
    /// failed call reverts it.
    ///
    /// Returns whether the server confirmed the mutation. Quantity zero
    /// is rejected up front (removal is [`Self::remove_item`]); a missing
    /// line is a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }

        let previous = {
            let mut state = self.lock();
            let Some(item) = state.cart.item(product_id) else {
                return false;
            };
            let previous = item.quantity;
            state.cart.set_item_quantity(product_id, quantity);
            state.cart.set_updating(product_id, true);
            previous
        };

        let result = self.inner.api.update_cart_item(product_id, quantity).await;

        match result {
            Ok(entry) => {
                let mut state = self.lock();
                state.cart.set_updating(product_id, false);
                state.cart.reconcile_entry(&entry);
                true
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.cart.set_updating(product_id, false);
                    // The line may have been removed while the update was
                    // in flight; then there is nothing to restore.
                    state.cart.set_item_quantity(product_id, previous);
                }
                self.report_failure(&e, messages::CART_UPDATE_FAILED);
                false
            }
        }
    }

    /// Increase a line's quantity by one.
    pub async fn increment_quantity(&self, product_id: ProductId) -> bool {
        let Some(quantity) = self.lock().cart.item(product_id).map(|item| item.quantity) else {
            return false;
        };
        self.set_quantity(product_id, quantity + 1).await
    }

    /// Decrease a line's quantity by one. At quantity 1 this is a no-op
    /// that issues no network call; removal is a distinct operation.
    pub async fn decrement_quantity(&self, product_id: ProductId) -> bool {
        let Some(quantity) = self.lock().cart.item(product_id).map(|item| item.quantity) else {
            return false;
        };
        if quantity <= 1 {
            return false;
        }
        self.set_quantity(product_id, quantity - 1).await
    }

    /// Remove a line. It disappears immediately; a failed call reinserts
    /// it at its old position.
    ///
    /// Returns whether the server confirmed the removal.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: ProductId) -> bool {
        let (index, item) = {
            let mut state = self.lock();
            let Some(taken) = state.cart.take_item(product_id) else {
                return false;
            };
            state.cart.set_updating(product_id, true);
            taken
        };

        let result = self.inner.api.remove_cart_item(product_id).await;

        match result {
            Ok(()) => {
                self.lock().cart.set_updating(product_id, false);
                true
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.cart.set_updating(product_id, false);
                    state.cart.restore_at(index, item);
                }
                self.report_failure(&e, messages::CART_REMOVE_FAILED);
                false
            }
        }
    }

    /// Remove every line. The cart empties immediately; a failed call
    /// restores the full list.
    ///
    /// Returns whether the server confirmed the clear.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> bool {
        let previous = {
            let mut state = self.lock();
            if state.cart.is_empty() {
                return true;
            }
            state.cart.clear_items()
        };

        match self.inner.api.clear_cart().await {
            Ok(()) => true,
            Err(e) => {
                self.lock().cart.restore_items(previous);
                self.report_failure(&e, messages::CART_CLEAR_FAILED);
                false
            }
        }
    }
}
