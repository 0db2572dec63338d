//! Cache value types for the catalog client.

use greenbasket_core::ProductSummary;

/// Values stored in the catalog response cache.
///
/// Boxed single products keep the enum small; list variants are cloned on
/// hit anyway.
#[derive(Clone)]
pub enum CacheValue {
    Product(Box<ProductSummary>),
    Products(Vec<ProductSummary>),
}
