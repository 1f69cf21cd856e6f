//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDER_RELAY_URL` - Form-relay endpoint orders are posted to
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_RATE_LIMIT` - Enable rate limiting (default: true)
//! - `CATALOG_PATH` - Product catalog JSON (default: bundled catalog)
//! - `ORDER_RELAY_TIMEOUT_SECS` - Relay request timeout (default: 30)
//! - `CHECKOUT_PROCESSING_DELAY_MS` - Simulated payment delay (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Whether per-IP rate limiting is applied
    pub rate_limit: bool,
    /// Product catalog file; the bundled catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Order relay configuration
    pub relay: RelayConfig,
    /// Checkout behaviour
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Outbound order relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Endpoint the order JSON is posted to
    pub url: Url,
    /// Whole-request timeout
    pub timeout: Duration,
}

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Simulated payment processing delay before the order is relayed
    pub processing_delay: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
        }
    }
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

        let host = parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let rate_limit = parse_env_or_default("STOREFRONT_RATE_LIMIT", "true")?;
        let catalog_path = get_optional_env("CATALOG_PATH").map(PathBuf::from);
        let relay = RelayConfig::from_env()?;
        let checkout = CheckoutConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            rate_limit,
            catalog_path,
            relay,
            checkout,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl RelayConfig {
    /// Load relay configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ORDER_RELAY_URL` is missing or not an
    /// http(s) URL, or if the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("ORDER_RELAY_URL")?;
        let url = parse_relay_url(&raw)?;
        let secs: u64 = parse_env_or_default("ORDER_RELAY_TIMEOUT_SECS", "30")?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(secs),
        })
    }
}

impl CheckoutConfig {
    /// Load checkout configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the delay is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let millis: u64 = parse_env_or_default("CHECKOUT_PROCESSING_DELAY_MS", "2000")?;
        Ok(Self {
            processing_delay: Duration::from_millis(millis),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate the relay endpoint.
fn parse_relay_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("ORDER_RELAY_URL".to_string(), msg);

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme: {}", url.scheme())));
    }
    Ok(url)
}
