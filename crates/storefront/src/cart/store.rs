//! Cookie-backed cart persistence.
//!
//! The cart lives in a browser-style cookie jar as a URL-encoded JSON blob
//! under the `cart` key. The blob is an array of `{"id", "amount", "price"}`
//! objects, the format the storefront has always written, so carts created
//! by older sessions keep deserializing.

use std::collections::HashMap;

use thiserror::Error;

use super::Cart;

/// Cookie name holding the serialized cart.
pub const CART_COOKIE: &str = "cart";

/// Errors that can occur reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored blob is not valid cart JSON.
    #[error("cart blob parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The stored blob is not valid URL-encoded UTF-8.
    #[error("cart blob encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// External key/value store holding the persisted cart.
///
/// `read` returns `None` when no entry exists, which is distinct from an
/// empty cart: removing the last line item deletes the entry entirely.
pub trait CartStore {
    /// Read the persisted cart, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored entry exists but cannot be decoded.
    fn read(&self) -> Result<Option<Cart>, StoreError>;

    /// Persist the full cart, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    fn write(&mut self, cart: &Cart) -> Result<(), StoreError>;

    /// Delete the persisted entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the delete.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// An in-memory cookie jar keyed by cookie name.
///
/// Stands in for the browser's cookie store; the session layer owns the
/// real jar and hands a view of it to the storefront.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    values: HashMap<String, String>,
}

impl CookieJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a cookie value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a cookie.
    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Whether a cookie with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// [`CartStore`] implementation over a [`CookieJar`].
#[derive(Debug, Default)]
pub struct CookieCartStore {
    jar: CookieJar,
}

impl CookieCartStore {
    /// Create a store over an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing jar (e.g. parsed from a request).
    #[must_use]
    pub const fn from_jar(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Access the underlying jar.
    #[must_use]
    pub const fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

impl CartStore for CookieCartStore {
    fn read(&self) -> Result<Option<Cart>, StoreError> {
        let Some(raw) = self.jar.get(CART_COOKIE) else {
            return Ok(None);
        };

        let decoded = urlencoding::decode(raw)?;
        let cart: Cart = serde_json::from_str(&decoded)?;
        Ok(Some(cart))
    }

    fn write(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let json = serde_json::to_string(cart)?;
        self.jar.set(CART_COOKIE, urlencoding::encode(&json));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.jar.remove(CART_COOKIE);
        Ok(())
    }
}
