//! Application state shared across storefront sessions.

use std::sync::Arc;

use tracing::instrument;

use greenbasket_core::ProductId;

use crate::cart::{Cart, CartReconciler, CartStore};
use crate::catalog::{CatalogClient, ProductRepository};
use crate::config::StorefrontConfig;
use crate::error::Result;

/// Application state shared across all sessions.
///
/// Cheaply cloneable via `Arc`. Per-session state (the cart, the search
/// session) is NOT held here; it is passed explicitly into operations so
/// the components stay independently testable.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
}

impl AppState {
    /// Create application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Add one unit of a product to a session's cart.
    ///
    /// Looks up the product to get its current unit price, then reconciles
    /// the cart. This is the add-to-cart flow behind the product card.
    ///
    /// # Errors
    ///
    /// Returns an error if the product lookup or the cart write-through
    /// fails; the cart is unchanged on a failed lookup.
    #[instrument(skip(self, reconciler, cart), fields(product_id = %product_id))]
    pub async fn add_to_cart<S: CartStore>(
        &self,
        reconciler: &mut CartReconciler<S>,
        cart: &mut Cart,
        product_id: &ProductId,
    ) -> Result<()> {
        let product = self.inner.catalog.find_by_id(product_id).await?;
        reconciler.add_item(cart, product_id, product.price)?;
        Ok(())
    }
}
