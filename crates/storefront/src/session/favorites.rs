//! Favorites operations: remote for signed-in users, the local guest
//! store otherwise.

use tracing::{instrument, warn};

use crate::api::ApiError;
use crate::api::types::ProductSummary;
use crate::messages;

use super::{AuthState, StoreSession};

/// What happened to a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle settled; `is_favorite` is the authoritative membership.
    Applied {
        /// Membership after the toggle.
        is_favorite: bool,
    },
    /// A toggle for the same product was still in flight; no call was
    /// issued.
    Suppressed,
    /// The remote call failed; the optimistic flip was rolled back.
    Failed,
}

impl StoreSession {
    /// Load favorites for the current auth state: the account list when
    /// signed in, the guest store when signed out. While the auth probe
    /// is unresolved, nothing is fetched and the snapshot stays in its
    /// neutral unloaded state.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails; the snapshot is left
    /// untouched.
    #[instrument(skip(self))]
    pub async fn load_favorites(&self) -> Result<(), ApiError> {
        match self.auth() {
            AuthState::Authenticated(_) => {
                let payload = self.inner.api.favorites().await?;
                self.lock().favorites.replace_remote(payload);
                Ok(())
            }
            AuthState::Unauthenticated { .. } => {
                let items = self.inner.guest.items();
                self.lock().favorites.replace_guest(items);
                Ok(())
            }
            AuthState::Unchecked | AuthState::Checking => Ok(()),
        }
    }

    /// Flip a product's favorite membership.
    ///
    /// Signed out, the flip lands in the guest store on the same turn and
    /// never touches the network. Signed in, the membership flips
    /// optimistically and the server's answer is authoritative; a second
    /// toggle for the same product is suppressed while the first is in
    /// flight, so a double-click cannot flicker the state.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle_favorite(&self, product: &ProductSummary) -> ToggleOutcome {
        let previous = {
            let mut state = self.lock();

            if !state.auth.is_authenticated() {
                return match self.inner.guest.toggle(product) {
                    Ok(is_favorite) => {
                        state.favorites.set_membership(product, is_favorite);
                        state.favorites.mark_guest_loaded();
                        ToggleOutcome::Applied { is_favorite }
                    }
                    Err(e) => {
                        warn!("Guest favorites store write failed: {e}");
                        drop(state);
                        self.push_error(messages::FAVORITE_TOGGLE_FAILED);
                        ToggleOutcome::Failed
                    }
                };
            }

            if state.favorites.is_pending(product.id) {
                return ToggleOutcome::Suppressed;
            }

            let previous = state.favorites.is_favorite(product.id);
            state.favorites.set_pending(product.id, true);
            state.favorites.set_membership(product, !previous);
            previous
        };

        let result = self.inner.api.toggle_favorite(product.id, !previous).await;

        match result {
            Ok(is_favorite) => {
                let mut state = self.lock();
                state.favorites.set_pending(product.id, false);
                // The optimistic guess and the server can disagree if the
                // membership changed elsewhere; the server wins.
                state.favorites.set_membership(product, is_favorite);
                ToggleOutcome::Applied { is_favorite }
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.favorites.set_pending(product.id, false);
                    state.favorites.set_membership(product, previous);
                }
                self.report_failure(&e, messages::FAVORITE_TOGGLE_FAILED);
                ToggleOutcome::Failed
            }
        }
    }
}
