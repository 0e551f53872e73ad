//! Typed client for the Ecom Market store API.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest` with a shared cookie store. The session
//!   cookie carries both the authenticated session and the guest cart, so
//!   the same client works in every auth state.
//! - Responses decode into strict payload types; cart and favorites
//!   payloads are additionally validated before they reach the snapshot
//!   layer (quantity bounds, product id uniqueness).
//! - Catalog reads are cached in-memory via `moka` (5-minute TTL). Cart,
//!   favorites, auth, and order state is never cached.
//! - No automatic retry: every failure is classified and returned to the
//!   caller, which decides whether to roll back optimistic state.

mod cache;
mod client;
pub mod types;

pub use client::{ApiClient, ProductQuery};

use thiserror::Error;

/// Errors returned by the store API client.
///
/// Classification matters to callers only for presentation and for the
/// session-expiry transition; rollback of optimistic state is unconditional
/// on any failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server rejected the request as invalid (4xx with detail).
    #[error("validation error: {0}")]
    Validation(String),

    /// The session is no longer authenticated (401).
    #[error("authentication required or expired")]
    AuthExpired,

    /// The requested resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the server (429).
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The server failed (5xx).
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// The response body did not parse as the expected shape.
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response parsed but violated a payload invariant.
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Product 123 not found".to_owned());
        assert_eq!(err.to_string(), "not found: Product 123 not found");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_server_display() {
        let err = ApiError::Server(502);
        assert_eq!(err.to_string(), "server error: HTTP 502");
    }

    #[test]
    fn test_auth_expired_display() {
        assert_eq!(
            ApiError::AuthExpired.to_string(),
            "authentication required or expired"
        );
    }

    #[test]
    fn test_invalid_payload_display() {
        let err = ApiError::InvalidPayload("cart item quantity is zero".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid response payload: cart item quantity is zero"
        );
    }
}
