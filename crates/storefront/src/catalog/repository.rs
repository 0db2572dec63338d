//! Product repository boundary.

use thiserror::Error;

use greenbasket_core::{CategoryId, Color, Condition, Money, ProductId, ProductSummary};

/// Errors that can occur when querying the product catalog.
///
/// All variants are recoverable at the boundary: the caller decides whether
/// to show a message, retry, or ignore. The core itself never retries.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend returned a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Read-only access to the product catalog.
///
/// List finders return an empty list when nothing matches; only
/// [`find_by_id`](Self::find_by_id) treats a miss as an error.
#[allow(async_fn_in_trait)]
pub trait ProductRepository {
    /// Products within a price range.
    async fn find_by_price_range(
        &self,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// Products with a given condition, within a price range.
    async fn find_by_condition(
        &self,
        condition: Condition,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// Products with a given color, within a price range.
    async fn find_by_color(
        &self,
        color: Color,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// Products matching both condition and color, within a price range.
    async fn find_by_condition_and_color(
        &self,
        condition: Condition,
        color: Color,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// All products in a category.
    async fn find_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// Free-text search over the catalog.
    async fn find_by_text(&self, query: &str) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// A single product by ID.
    async fn find_by_id(&self, id: &ProductId) -> Result<ProductSummary, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::NotFound("product abc".to_string());
        assert_eq!(err.to_string(), "Not found: product abc");

        let err = RepositoryError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: boom");

        let err = RepositoryError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
