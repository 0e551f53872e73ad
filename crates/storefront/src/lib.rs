//! Ecom Market Storefront - typed client and state synchronization.
//!
//! This crate is the client side of the Ecom Market store: a typed wrapper
//! over the store's REST API plus the state layer a storefront UI reads
//! from. It keeps an in-memory snapshot of the cart and the favorites set,
//! applies every mutation optimistically, and reconciles (or rolls back)
//! when the server answers.
//!
//! # Architecture
//!
//! - [`api`] - `ApiClient`, the typed REST client. Catalog reads are cached
//!   via `moka` (5-minute TTL); cart and favorites state is never cached.
//! - [`session`] - `StoreSession`, the snapshot cache and mutation
//!   coordinator. The only writer of cart/favorites state.
//! - [`guest`] - persistent fallback store for favorites of signed-out
//!   visitors, migrated to the account on login.
//! - [`config`] - environment-driven configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use ecom_market_storefront::config::StorefrontConfig;
//! use ecom_market_storefront::session::StoreSession;
//!
//! let config = StorefrontConfig::from_env()?;
//! let session = StoreSession::from_config(&config)?;
//!
//! session.refresh_auth().await;
//! session.load_cart().await?;
//!
//! let product = session.api().product(product_id).await?;
//! session.add_to_cart(&product.summary(), 1).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod guest;
pub mod messages;
pub mod session;
