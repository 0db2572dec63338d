//! Unified error handling for the storefront.
//!
//! Every failure in this crate is recoverable at the boundary: the caller
//! decides whether to show a message, retry, or ignore. There are no fatal
//! error classes and the core never retries on its own.

use thiserror::Error;

use crate::cart::StoreError;
use crate::catalog::RepositoryError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog repository operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] RepositoryError),

    /// Persisted cart store operation failed.
    #[error("Cart store error: {0}")]
    CartStore(#[from] StoreError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Catalog(RepositoryError::NotFound("product-123".to_string()));
        assert_eq!(err.to_string(), "Catalog error: Not found: product-123");

        let err = AppError::Config(ConfigError::MissingEnvVar("X".to_string()));
        assert_eq!(err.to_string(), "Config error: Missing environment variable: X");
    }

    #[test]
    fn test_from_conversions() {
        let err: AppError = RepositoryError::NotFound("p".to_string()).into();
        assert!(matches!(err, AppError::Catalog(_)));

        let err: AppError = StoreError::Parse(
            serde_json::from_str::<crate::cart::Cart>("not-json").expect_err("invalid json"),
        )
        .into();
        assert!(matches!(err, AppError::CartStore(_)));
    }
}
