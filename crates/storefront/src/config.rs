//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECOM_API_BASE_URL` - Base URL of the store API (e.g., `http://127.0.0.1:8000/api`)
//!
//! ## Optional
//! - `ECOM_API_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `ECOM_GUEST_STORE` - Path of the guest favorites file
//!   (default: `.ecom-market/favorites.json`)
//! - `ECOM_NOTICE_TTL_SECS` - Lifetime of transient notices in seconds (default: 4)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTICE_TTL_SECS: u64 = 4;
const DEFAULT_GUEST_STORE: &str = ".ecom-market/favorites.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Store API configuration
    pub api: ApiConfig,
    /// Path of the guest favorites file
    pub guest_store_path: PathBuf,
    /// Lifetime of transient notices
    pub notice_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Store API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the store API
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("ECOM_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("ECOM_API_BASE_URL".to_owned(), e.to_string()))?;
        let timeout_secs = parse_env_or_default("ECOM_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?;
        let notice_ttl_secs =
            parse_env_or_default("ECOM_NOTICE_TTL_SECS", DEFAULT_NOTICE_TTL_SECS)?;
        let guest_store_path =
            PathBuf::from(get_env_or_default("ECOM_GUEST_STORE", DEFAULT_GUEST_STORE));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            guest_store_path,
            notice_ttl: Duration::from_secs(notice_ttl_secs),
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a numeric environment variable, falling back to a default when unset.
fn parse_env_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_or_default_unset() {
        assert_eq!(
            get_env_or_default("ECOM_TEST_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_parse_env_or_default_unset() {
        let value = parse_env_or_default("ECOM_TEST_UNSET_NUMERIC", 30).unwrap();
        assert_eq!(value, 30);
    }

    #[test]
    fn test_missing_required_env() {
        let err = get_required_env("ECOM_TEST_DEFINITELY_MISSING").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: ECOM_TEST_DEFINITELY_MISSING"
        );
    }
}
