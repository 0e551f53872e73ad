//! Session transitions: the login/logout boundary where guest-local and
//! account state must be reconciled or cleared.

use tracing::{info, instrument, warn};

use ecom_market_core::Email;

use crate::api::ApiError;
use crate::api::types::{RegisterRequest, User};
use crate::messages;

use super::{AuthState, StoreSession};

impl StoreSession {
    /// Resolve the auth state: `Unchecked → Checking →` probe the server
    /// `→ Authenticated | Unauthenticated`.
    ///
    /// The probe runs once per session; later calls return the resolved
    /// state without a network call. A transport failure puts the state
    /// back to `Unchecked` so the probe can be retried.
    #[instrument(skip(self))]
    pub async fn refresh_auth(&self) -> AuthState {
        {
            let mut state = self.lock();
            match state.auth {
                AuthState::Unchecked => state.auth = AuthState::Checking,
                // Already resolved or another probe is in flight.
                _ => return state.auth.clone(),
            }
        }

        match self.inner.api.current_user().await {
            Ok(user) => self.on_authenticated(user).await,
            Err(ApiError::AuthExpired) => {
                self.lock().auth = AuthState::Unauthenticated { expired: false };
            }
            Err(e) => {
                warn!("Auth probe failed, will retry: {e}");
                self.lock().auth = AuthState::Unchecked;
            }
        }

        self.auth()
    }

    /// Log in. On success the guest favorites migrate to the account and
    /// both snapshots are re-fetched.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on bad credentials, or another
    /// error if a request fails. Local state is untouched on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<User, ApiError> {
        self.inner.api.login(email, password).await?;
        let user = self.inner.api.current_user().await?;
        self.on_authenticated(user.clone()).await;
        Ok(user)
    }

    /// Register a new account. Registration does not sign the user in;
    /// call [`Self::login`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the email or phone is taken,
    /// or another error if the request fails.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.inner.api.register(request).await
    }

    /// Log out. Local state is reset before the network call, and again
    /// after it settles: an in-flight mutation that resolves between the
    /// two resets would otherwise re-populate stale data.
    ///
    /// The guest store is cleared unconditionally so the next visitor on
    /// this machine does not inherit a stranger's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout request fails for a reason other
    /// than the session already being gone. Local state is reset either
    /// way.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.reset_local(false);

        let result = self.inner.api.logout().await;

        self.reset_local(false);

        match result {
            // The server already considered the session gone.
            Ok(()) | Err(ApiError::AuthExpired) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Entered on any successful authentication (login or resolved
    /// probe): migrate guest favorites, clear the guest store, and
    /// re-fetch both snapshots so nothing cached from guest mode is
    /// trusted.
    pub(crate) async fn on_authenticated(&self, user: User) {
        info!(user_id = %user.id, "Session authenticated");
        self.lock().auth = AuthState::Authenticated(user);

        // Best effort: a favorite that fails to migrate is logged and
        // dropped, never fatal to the login.
        let guest_items = self.inner.guest.items();
        for product in &guest_items {
            match self.inner.api.add_favorite(product.id).await {
                Ok(()) => {}
                Err(ApiError::Validation(detail)) if detail.contains("already in favorites") => {}
                Err(e) => {
                    warn!(product_id = %product.id, "Failed to migrate guest favorite: {e}");
                }
            }
        }
        if let Err(e) = self.inner.guest.clear() {
            warn!("Failed to clear guest favorites after migration: {e}");
        }

        {
            let mut state = self.lock();
            state.cart.reset();
            state.favorites.reset();
        }

        if let Err(e) = self.load_cart().await {
            warn!("Cart fetch after authentication failed: {e}");
            self.push_error(messages::CART_LOAD_FAILED);
        }
        if let Err(e) = self.load_favorites().await {
            warn!("Favorites fetch after authentication failed: {e}");
            self.push_error(messages::FAVORITES_LOAD_FAILED);
        }
    }

    /// A mutation hit a 401 mid-session: the same reset as a logout, but
    /// flagged as expiry so the UI words it differently.
    ///
    /// Must not be called while holding the session lock.
    pub(crate) fn expire_session(&self) {
        warn!("Session expired mid-session");
        self.reset_local(true);
        self.push_error(messages::SESSION_EXPIRED);
    }

    /// Reset both snapshots to `{items: [], loaded: false}`, drop the
    /// auth state to unauthenticated, and clear the guest store.
    pub(crate) fn reset_local(&self, expired: bool) {
        {
            let mut state = self.lock();
            state.cart.reset();
            state.favorites.reset();
            state.auth = AuthState::Unauthenticated { expired };
        }
        if let Err(e) = self.inner.guest.clear() {
            warn!("Failed to clear guest favorites: {e}");
        }
    }
}
