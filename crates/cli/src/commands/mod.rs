//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;

use thiserror::Error;

use ecom_market_core::EmailError;
use ecom_market_storefront::api::ApiError;
use ecom_market_storefront::session::StoreSession;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A store API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An email argument did not parse.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// A mutation was rejected or rolled back; the notice text carries
    /// the reason.
    #[error("{0}")]
    Rejected(String),
}

/// Print the session's live notices to stderr, the way the UI would show
/// its transient toasts.
#[allow(clippy::print_stderr)]
pub fn print_notices(session: &StoreSession) {
    for notice in session.notices() {
        eprintln!("! {}", notice.message());
    }
}

/// Build a `Rejected` error from the newest notice, falling back to a
/// generic message when the notice already expired.
pub fn rejection(session: &StoreSession, fallback: &str) -> CliError {
    let message = session
        .notices()
        .last()
        .map_or_else(|| fallback.to_owned(), |n| n.message().to_owned());
    CliError::Rejected(message)
}
