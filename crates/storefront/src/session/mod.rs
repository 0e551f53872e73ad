//! The store session: snapshot cache and optimistic mutation coordinator.
//!
//! # Architecture
//!
//! `StoreSession` owns the only mutable copy of cart and favorites state.
//! Every mutation follows the same shape:
//!
//! 1. capture the affected slice and apply the change locally, on the
//!    same synchronous turn, so the UI updates immediately;
//! 2. mark the product as updating and issue the remote call;
//! 3. on success, fold the authoritative response into whatever the
//!    snapshot looks like at completion time;
//! 4. on failure, restore the captured slice verbatim and surface a
//!    transient notice. Rollback is unconditional on any failure class.
//!
//! The session mutex is held only across the synchronous phases, never
//! across a network await, so concurrent in-flight requests settle in any
//! order and reconcile independently.
//!
//! # Single-writer rule
//!
//! Snapshot mutators are `pub(crate)`; nothing outside this module writes
//! cart or favorites state. Reads are unrestricted and side-effect-free
//! (except notice expiry, which prunes on read).

mod auth;
mod cart;
mod favorites;
mod notice;
mod orders;
mod snapshot;
mod transitions;

pub use auth::AuthState;
pub use favorites::ToggleOutcome;
pub use notice::{Notice, NoticeKind};
pub use snapshot::{CartItem, CartSnapshot, FavoritesSnapshot};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::guest::GuestFavorites;
use crate::messages;

use notice::NoticeBoard;

/// The session state behind the mutex. One synchronous turn at a time.
struct SessionState {
    cart: CartSnapshot,
    favorites: FavoritesSnapshot,
    auth: AuthState,
    notices: NoticeBoard,
}

struct SessionInner {
    api: ApiClient,
    guest: GuestFavorites,
    state: Mutex<SessionState>,
}

/// A storefront session: the typed API client plus the UI-facing state it
/// keeps in sync.
///
/// Cheaply cloneable; clones share the same state.
#[derive(Clone)]
pub struct StoreSession {
    inner: Arc<SessionInner>,
}

impl StoreSession {
    /// Create a session over an existing client and guest store.
    #[must_use]
    pub fn new(api: ApiClient, guest: GuestFavorites, notice_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                guest,
                state: Mutex::new(SessionState {
                    cart: CartSnapshot::default(),
                    favorites: FavoritesSnapshot::default(),
                    auth: AuthState::Unchecked,
                    notices: NoticeBoard::new(notice_ttl),
                }),
            }),
        }
    }

    /// Create a session from configuration: a fresh API client and a
    /// file-backed guest store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let guest = GuestFavorites::file(config.guest_store_path.clone());
        Ok(Self::new(api, guest, config.notice_ttl))
    }

    /// The underlying API client, for read paths that bypass the
    /// snapshot layer (catalog browsing).
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // =========================================================================
    // Read Selectors
    // =========================================================================

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> CartSnapshot {
        self.lock().cart.clone()
    }

    /// Current favorites snapshot.
    #[must_use]
    pub fn favorites(&self) -> FavoritesSnapshot {
        self.lock().favorites.clone()
    }

    /// Current auth state.
    #[must_use]
    pub fn auth(&self) -> AuthState {
        self.lock().auth.clone()
    }

    /// Live notices. Expired ones are pruned on the way out.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.active()
    }

    /// Dismiss a notice before its TTL runs out.
    pub fn dismiss_notice(&self, id: u64) {
        self.lock().notices.dismiss(id);
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push_error(&self, message: impl Into<String>) {
        self.lock().notices.push(NoticeKind::Error, message.into());
    }

    pub(crate) fn push_info(&self, message: impl Into<String>) {
        self.lock().notices.push(NoticeKind::Info, message.into());
    }

    /// Surface a mutation failure. Classification affects presentation
    /// only; the caller has already rolled back.
    ///
    /// Must not be called while holding the session lock.
    pub(crate) fn report_failure(&self, err: &ApiError, fallback: &str) {
        match err {
            ApiError::AuthExpired => self.expire_session(),
            ApiError::RateLimited(seconds) => {
                self.push_error(format!("{} ({seconds} с)", messages::RATE_LIMITED));
            }
            _ => self.push_error(fallback),
        }
    }
}
