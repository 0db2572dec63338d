//! Catalog REST API client implementation.
//!
//! Implements [`ProductRepository`] over the catalog backend's JSON API
//! using `reqwest`, caching read-mostly lookups (by ID, by category) with
//! `moka`. Search and filter queries are never cached - their result sets
//! are too parameter-dependent to be worth the memory.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use greenbasket_core::{CategoryId, Color, Condition, Money, ProductId, ProductSummary};

use crate::config::CatalogApiConfig;

use super::cache::CacheValue;
use super::repository::{ProductRepository, RepositoryError};

/// Client for the catalog REST API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and one
/// response cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

/// Wire representation of a product, as the backend returns it.
#[derive(Debug, Deserialize)]
struct ApiProduct {
    #[serde(rename = "_id")]
    id: ProductId,
    name: String,
    #[serde(rename = "imageUrl")]
    image_url: String,
    price: Money,
    #[serde(default)]
    description: String,
}

/// Envelope for list endpoints: `{ "products": [...] }`.
#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<ApiProduct>,
}

/// Envelope for the single-product endpoint: `{ "product": {...} }`.
#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: Option<ApiProduct>,
}

fn convert_product(api: ApiProduct) -> ProductSummary {
    ProductSummary {
        id: api.id,
        name: api.name,
        image_url: api.image_url,
        price: api.price,
        description: api.description,
    }
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        }
    }

    /// Execute a GET request and deserialize the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RepositoryError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.client.get(&url).query(query);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(RepositoryError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog API returned non-success status"
            );
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog API response"
            );
            RepositoryError::Parse(e)
        })
    }

    async fn get_products(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let envelope: ProductsEnvelope = self.get_json(path, query).await?;
        Ok(envelope.products.into_iter().map(convert_product).collect())
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: &ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

fn price_params(min: Money, max: Money) -> [(&'static str, String); 2] {
    [
        ("min", min.amount().to_string()),
        ("max", max.amount().to_string()),
    ]
}

impl ProductRepository for CatalogClient {
    #[instrument(skip(self))]
    async fn find_by_price_range(
        &self,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        self.get_products("/products/price", &price_params(min, max))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_condition(
        &self,
        condition: Condition,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let [min_param, max_param] = price_params(min, max);
        self.get_products(
            "/products/condition",
            &[
                ("condition", condition.as_str().to_string()),
                min_param,
                max_param,
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_color(
        &self,
        color: Color,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let [min_param, max_param] = price_params(min, max);
        self.get_products(
            "/products/color",
            &[("color", color.as_str().to_string()), min_param, max_param],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_condition_and_color(
        &self,
        condition: Condition,
        color: Color,
        min: Money,
        max: Money,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let [min_param, max_param] = price_params(min, max);
        self.get_products(
            "/products/queries",
            &[
                ("condition", condition.as_str().to_string()),
                ("color", color.as_str().to_string()),
                min_param,
                max_param,
            ],
        )
        .await
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn find_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let cache_key = format!("category:{category}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for category listing");
            return Ok(products);
        }

        let products = self
            .get_products(&format!("/products/category/{category}"), &[])
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_text(&self, query: &str) -> Result<Vec<ProductSummary>, RepositoryError> {
        self.get_products("/products/search", &[("q", query.to_string())])
            .await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &ProductId) -> Result<ProductSummary, RepositoryError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let envelope: ProductEnvelope = self.get_json(&format!("/products/{id}"), &[]).await?;

        let product = envelope
            .product
            .map(convert_product)
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_product_deserializes_backend_field_names() {
        let json = r#"{
            "_id": "64f1c2",
            "name": "Oat Milk",
            "imageUrl": "https://cdn.example/oat.jpg",
            "price": 4.99,
            "description": "Barista edition",
            "color": "white",
            "condition": "new",
            "status": true
        }"#;

        let api: ApiProduct = serde_json::from_str(json).expect("deserialize");
        let product = convert_product(api);
        assert_eq!(product.id, ProductId::new("64f1c2"));
        assert_eq!(product.name, "Oat Milk");
        assert_eq!(product.image_url, "https://cdn.example/oat.jpg");
        assert_eq!(product.price, Money::new(4.99));
        assert_eq!(product.description, "Barista edition");
    }

    #[test]
    fn test_missing_description_defaults_empty() {
        let json = r#"{"_id": "p1", "name": "Eggs", "imageUrl": "u", "price": 3}"#;
        let api: ApiProduct = serde_json::from_str(json).expect("deserialize");
        assert!(api.description.is_empty());
    }

    #[test]
    fn test_products_envelope() {
        let json = r#"{"products": [
            {"_id": "a", "name": "A", "imageUrl": "u", "price": 1},
            {"_id": "b", "name": "B", "imageUrl": "u", "price": 2}
        ]}"#;
        let envelope: ProductsEnvelope = serde_json::from_str(json).expect("deserialize");
        assert_eq!(envelope.products.len(), 2);
    }

    #[test]
    fn test_product_envelope_allows_null() {
        let envelope: ProductEnvelope =
            serde_json::from_str(r#"{"product": null}"#).expect("deserialize");
        assert!(envelope.product.is_none());
    }

    #[test]
    fn test_price_params_render_plain_numbers() {
        let [min, max] = price_params(Money::new(30.0), Money::new(250.0));
        assert_eq!(min, ("min", "30".to_string()));
        assert_eq!(max, ("max", "250".to_string()));
    }
}
