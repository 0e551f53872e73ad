//! In-memory snapshots of server-owned cart and favorites state.
//!
//! Snapshots are what the UI reads synchronously. Every derived value
//! (subtotals, totals, membership flags) is computed on read; nothing is
//! cached where it could go stale. Mutators are `pub(crate)`: the session
//! coordinator is the single writer.

use std::collections::HashSet;

use ecom_market_core::{Price, ProductId};

use crate::api::types::{CartEntryPayload, CartPayload, FavoritesPayload, ProductSummary};

// =============================================================================
// Cart
// =============================================================================

/// One line of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Denormalized product snapshot captured at listing time.
    pub product: ProductSummary,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// Price captured when the item was added; not re-priced when the
    /// catalog price changes.
    pub price_at_addition: Price,
}

impl CartItem {
    /// Line subtotal, recomputed on every read.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price_at_addition * self.quantity
    }
}

/// The cart as the UI sees it.
///
/// `loaded` distinguishes "never fetched" from "fetched and empty".
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    items: Vec<CartItem>,
    loaded: bool,
    updating: HashSet<ProductId>,
}

impl CartSnapshot {
    /// Cart lines in server order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has been fetched at least once this session.
    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.loaded
    }

    /// Whether a mutation for this product is in flight (drives the
    /// per-row busy indicator).
    #[must_use]
    pub fn is_updating(&self, product_id: ProductId) -> bool {
        self.updating.contains(&product_id)
    }

    /// The line for one product, if present.
    #[must_use]
    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Total price across all lines, from historical line prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // -------------------------------------------------------------------------
    // Mutators (coordinator only)
    // -------------------------------------------------------------------------

    /// Replace the whole snapshot from a validated server payload.
    /// In-flight updating marks survive; their owners clear them on settle.
    pub(crate) fn replace_from(&mut self, payload: CartPayload) {
        self.items = payload
            .items
            .into_iter()
            .map(|entry| CartItem {
                product: entry.product,
                quantity: entry.quantity,
                price_at_addition: entry.price_at_addition,
            })
            .collect();
        self.loaded = true;
    }

    pub(crate) fn push_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Add to an existing line's quantity.
    pub(crate) fn bump_quantity(&mut self, product_id: ProductId, delta: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity += delta;
        }
    }

    pub(crate) fn set_item_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line, returning it with its position for possible rollback.
    pub(crate) fn take_item(&mut self, product_id: ProductId) -> Option<(usize, CartItem)> {
        let index = self.items.iter().position(|i| i.product.id == product_id)?;
        Some((index, self.items.remove(index)))
    }

    /// Remove a line without keeping it.
    pub(crate) fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Reinsert a previously taken line at its old position (clamped to
    /// the current length, which may have shrunk meanwhile).
    pub(crate) fn restore_at(&mut self, index: usize, item: CartItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Put a captured line back, replacing the current line for the same
    /// product if one exists.
    pub(crate) fn restore_item(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product.id == item.product.id)
        {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    pub(crate) fn clear_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }

    pub(crate) fn restore_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    /// Fold an authoritative server line into the snapshot. If the line
    /// vanished locally while the request was in flight (removed by a
    /// concurrent mutation), the result is dropped: reconciliation is
    /// against the state at completion time.
    pub(crate) fn reconcile_entry(&mut self, entry: &CartEntryPayload) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product.id == entry.product_id)
        {
            item.quantity = entry.quantity;
            item.price_at_addition = entry.price_at_addition;
            item.product = entry.product.clone();
        }
    }

    pub(crate) fn set_updating(&mut self, product_id: ProductId, updating: bool) {
        if updating {
            self.updating.insert(product_id);
        } else {
            self.updating.remove(&product_id);
        }
    }

    /// Back to the never-fetched state (logout, session expiry, checkout).
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.loaded = false;
        self.updating.clear();
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// The favorites set as the UI sees it.
#[derive(Debug, Clone, Default)]
pub struct FavoritesSnapshot {
    items: Vec<ProductSummary>,
    loaded: bool,
    is_guest: bool,
    pending: HashSet<ProductId>,
}

impl FavoritesSnapshot {
    /// Favorited products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ProductSummary] {
        &self.items
    }

    /// Whether the favorites have been fetched (or read from the guest
    /// store) at least once this session.
    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the set is backed by the local guest store instead of the
    /// account.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.is_guest
    }

    /// Whether the product is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Whether a toggle for this product is in flight. A second toggle is
    /// suppressed while this is true.
    #[must_use]
    pub fn is_pending(&self, product_id: ProductId) -> bool {
        self.pending.contains(&product_id)
    }

    /// Number of favorited products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    // -------------------------------------------------------------------------
    // Mutators (coordinator only)
    // -------------------------------------------------------------------------

    /// Replace the snapshot from a validated remote payload.
    pub(crate) fn replace_remote(&mut self, payload: FavoritesPayload) {
        self.items = payload.items.into_iter().map(|entry| entry.product).collect();
        self.loaded = true;
        self.is_guest = false;
    }

    /// Replace the snapshot from the guest store.
    pub(crate) fn replace_guest(&mut self, items: Vec<ProductSummary>) {
        self.items = items;
        self.loaded = true;
        self.is_guest = true;
    }

    /// Mark the snapshot as guest-backed and loaded without replacing the
    /// items (first guest toggle before any explicit load).
    pub(crate) fn mark_guest_loaded(&mut self) {
        self.loaded = true;
        self.is_guest = true;
    }

    /// Drive the membership of one product to the given value.
    pub(crate) fn set_membership(&mut self, product: &ProductSummary, is_favorite: bool) {
        let present = self.is_favorite(product.id);
        if is_favorite && !present {
            self.items.push(product.clone());
        } else if !is_favorite && present {
            self.items.retain(|item| item.id != product.id);
        }
    }

    pub(crate) fn set_pending(&mut self, product_id: ProductId, pending: bool) {
        if pending {
            self.pending.insert(product_id);
        } else {
            self.pending.remove(&product_id);
        }
    }

    /// Back to the never-fetched state (logout, session expiry).
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.loaded = false;
        self.is_guest = false;
        self.pending.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecom_market_core::CartItemId;
    use crate::api::types::FavoriteEntryPayload;

    fn product(id: i32, kopecks: i64) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_kopecks(kopecks),
            main_image: None,
            part_number: format!("PN-{id:05}"),
        }
    }

    fn item(id: i32, quantity: u32, kopecks: i64) -> CartItem {
        CartItem {
            product: product(id, kopecks),
            quantity,
            price_at_addition: Price::from_kopecks(kopecks),
        }
    }

    #[test]
    fn test_subtotal_recomputed_on_read() {
        let mut line = item(1, 2, 10_000);
        assert_eq!(line.subtotal(), Price::from_kopecks(20_000));
        line.quantity = 5;
        assert_eq!(line.subtotal(), Price::from_kopecks(50_000));
    }

    #[test]
    fn test_totals() {
        let mut cart = CartSnapshot::default();
        cart.push_item(item(1, 2, 10_000));
        cart.push_item(item(2, 1, 5_000));
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_price(), Price::from_kopecks(25_000));
    }

    #[test]
    fn test_price_at_addition_survives_reconcile_of_other_lines() {
        let mut cart = CartSnapshot::default();
        cart.push_item(item(1, 2, 10_000));
        cart.push_item(item(2, 1, 5_000));

        // Server answers for product 2; product 1's historical price must
        // not move.
        cart.reconcile_entry(&CartEntryPayload {
            id: CartItemId::new(2),
            product_id: ProductId::new(2),
            quantity: 4,
            price_at_addition: Price::from_kopecks(5_000),
            product: product(2, 5_000),
        });

        assert_eq!(cart.item(ProductId::new(2)).unwrap().quantity, 4);
        assert_eq!(
            cart.item(ProductId::new(1)).unwrap().price_at_addition,
            Price::from_kopecks(10_000)
        );
    }

    #[test]
    fn test_reconcile_dropped_for_absent_line() {
        let mut cart = CartSnapshot::default();
        cart.reconcile_entry(&CartEntryPayload {
            id: CartItemId::new(9),
            product_id: ProductId::new(9),
            quantity: 4,
            price_at_addition: Price::from_kopecks(100),
            product: product(9, 100),
        });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_take_and_restore_keeps_position() {
        let mut cart = CartSnapshot::default();
        cart.push_item(item(1, 1, 100));
        cart.push_item(item(2, 1, 100));
        cart.push_item(item(3, 1, 100));

        let (index, taken) = cart.take_item(ProductId::new(2)).unwrap();
        assert_eq!(index, 1);
        cart.restore_at(index, taken);

        let ids: Vec<i32> = cart.items().iter().map(|i| i.product.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_restore_at_clamps_index() {
        let mut cart = CartSnapshot::default();
        cart.restore_at(5, item(1, 1, 100));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_reset_clears_loaded_flag() {
        let mut cart = CartSnapshot::default();
        cart.replace_from(CartPayload {
            items: vec![],
            total_items: 0,
            total_price: Price::ZERO,
        });
        assert!(cart.loaded());
        cart.reset();
        assert!(!cart.loaded());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_favorites_membership() {
        let mut favorites = FavoritesSnapshot::default();
        favorites.set_membership(&product(1, 100), true);
        assert!(favorites.is_favorite(ProductId::new(1)));
        // Setting the same direction twice is a no-op
        favorites.set_membership(&product(1, 100), true);
        assert_eq!(favorites.count(), 1);
        favorites.set_membership(&product(1, 100), false);
        assert!(!favorites.is_favorite(ProductId::new(1)));
    }

    #[test]
    fn test_favorites_replace_remote_clears_guest_flag() {
        let mut favorites = FavoritesSnapshot::default();
        favorites.replace_guest(vec![product(1, 100)]);
        assert!(favorites.is_guest());

        favorites.replace_remote(FavoritesPayload {
            items: vec![FavoriteEntryPayload {
                product_id: ProductId::new(2),
                product: product(2, 100),
            }],
        });
        assert!(!favorites.is_guest());
        assert!(favorites.is_favorite(ProductId::new(2)));
        assert!(!favorites.is_favorite(ProductId::new(1)));
    }
}
