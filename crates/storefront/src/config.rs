//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_SOURCE` - Identifier the catalog view reads its products from
//!   (default: `gid://shopify/Product/7982905098262`)
//! - `SHOP_API_BASE_URL` - Base URL of the shop API backing the cart view
//!   (default: `https://api.escuelajs.co/api/v1`)
//! - `VIEW_IDLE_TIMEOUT_SECS` - Seconds a cart view may sit idle before it is
//!   torn down (default: 1800)
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_SOURCE: &str = "gid://shopify/Product/7982905098262";
pub const DEFAULT_SHOP_API_BASE_URL: &str = "https://api.escuelajs.co/api/v1";
const DEFAULT_VIEW_IDLE_TIMEOUT_SECS: u64 = 1800;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote API configuration
    pub api: ApiConfig,
    /// How long an untouched cart view stays mounted
    pub view_idle_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Remote catalog and shop API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Opaque identifier of the catalog view's product source.
    ///
    /// Not validated here; a source that cannot be resolved surfaces as a
    /// load failure in the catalog view.
    pub catalog_source: String,
    /// Base URL of the shop API (`{base}/products`, `{base}/cart`).
    pub shop_base_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let api = ApiConfig::from_env()?;

        let idle_secs = parse_env_or_default::<u64>(
            "VIEW_IDLE_TIMEOUT_SECS",
            &DEFAULT_VIEW_IDLE_TIMEOUT_SECS.to_string(),
        )?;
        if idle_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VIEW_IDLE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let log_format = get_env_or_default("LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOG_FORMAT".to_string(), e))?;

        let sentry_sample_rate = parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            api,
            view_idle_timeout: Duration::from_secs(idle_secs),
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    /// Build an API configuration from a catalog source and a shop base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the base URL is not an
    /// http(s) URL with a host.
    pub fn new(catalog_source: impl Into<String>, shop_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_source: catalog_source.into(),
            shop_base_url: parse_base_url("SHOP_API_BASE_URL", shop_base_url)?,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            get_env_or_default("CATALOG_SOURCE", DEFAULT_CATALOG_SOURCE),
            &get_env_or_default("SHOP_API_BASE_URL", DEFAULT_SHOP_API_BASE_URL),
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = parse_env_or_default::<f32>(key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Parse a base URL, requiring an http(s) scheme and a host.
///
/// A trailing slash is added so relative joins keep the last path segment
/// (`.../api/v1/` + `products` rather than `.../api/products`).
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL must have a host".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
