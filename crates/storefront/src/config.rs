//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENBASKET_API_BASE_URL` - Catalog backend base URL
//!
//! ## Optional
//! - `GREENBASKET_API_TOKEN` - Bearer token for authenticated catalog calls
//! - `GREENBASKET_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `GREENBASKET_CACHE_TTL_SECS` - Catalog cache TTL (default: 300)

use std::env;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog API client configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Catalog backend base URL
    pub base_url: String,
    /// Bearer token for authenticated calls (favorites, account)
    pub api_token: Option<SecretString>,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Catalog response cache TTL in seconds
    pub cache_ttl_secs: u64,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API configuration
    pub catalog: CatalogApiConfig,
}

impl StorefrontConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an injected variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = require(&lookup, "GREENBASKET_API_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GREENBASKET_API_BASE_URL".to_string(), e.to_string())
        })?;

        let api_token = lookup("GREENBASKET_API_TOKEN")
            .filter(|token| !token.is_empty())
            .map(SecretString::from);

        let http_timeout_secs =
            parse_secs(&lookup, "GREENBASKET_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let cache_ttl_secs =
            parse_secs(&lookup, "GREENBASKET_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            catalog: CatalogApiConfig {
                base_url,
                api_token,
                http_timeout_secs,
                cache_ttl_secs,
            },
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(name).map_or(Ok(default), |value| {
        value
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_string(), value))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let env = vars(pairs);
        StorefrontConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn test_minimal_config() {
        let config = load(&[("GREENBASKET_API_BASE_URL", "https://api.example.com")])
            .expect("valid config");
        assert_eq!(config.catalog.base_url, "https://api.example.com");
        assert!(config.catalog.api_token.is_none());
        assert_eq!(config.catalog.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.catalog.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "Missing environment variable: GREENBASKET_API_BASE_URL"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("GREENBASKET_API_BASE_URL", "not a url")]).expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "GREENBASKET_API_BASE_URL"));
    }

    #[test]
    fn test_overrides_and_token() {
        let config = load(&[
            ("GREENBASKET_API_BASE_URL", "https://api.example.com"),
            ("GREENBASKET_API_TOKEN", "tok-123"),
            ("GREENBASKET_HTTP_TIMEOUT_SECS", "5"),
            ("GREENBASKET_CACHE_TTL_SECS", "60"),
        ])
        .expect("valid config");
        assert!(config.catalog.api_token.is_some());
        assert_eq!(config.catalog.http_timeout_secs, 5);
        assert_eq!(config.catalog.cache_ttl_secs, 60);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[
            ("GREENBASKET_API_BASE_URL", "https://api.example.com"),
            ("GREENBASKET_HTTP_TIMEOUT_SECS", "soon"),
        ])
        .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "Invalid environment variable GREENBASKET_HTTP_TIMEOUT_SECS: soon"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[
            ("GREENBASKET_API_BASE_URL", "https://api.example.com"),
            ("GREENBASKET_API_TOKEN", "tok-123"),
        ])
        .expect("valid config");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok-123"));
    }
}
