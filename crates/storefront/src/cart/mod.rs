//! Cart state and reconciliation against the persisted cookie store.
//!
//! The cart is an ordered list of line items, one per product. Every
//! effective mutation writes the full cart through to the persisted store
//! and publishes a snapshot on a watch channel so dependent state (the cart
//! badge) can re-render without polling.
//!
//! Subtotal arithmetic is deliberate: adding recomputes the line subtotal
//! from the fresh unit price, while removing scales the existing subtotal
//! down proportionally (`subtotal -= subtotal / quantity`). Removal never
//! needs the product record, at the cost of floating-point drift across
//! repeated partial removals. Changing this would change observable
//! subtotals, so it stays.

pub mod store;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use greenbasket_core::{Money, ProductId};

pub use store::{CART_COOKIE, CartStore, CookieCartStore, CookieJar, StoreError};

/// One product's aggregated quantity and subtotal within a cart.
///
/// Serialized field names match the cookie blob the storefront has always
/// written (`id`/`amount`/`price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(rename = "amount")]
    pub quantity: u32,
    #[serde(rename = "price")]
    pub subtotal: Money,
}

/// Outcome of removing one unit of a product from a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveOutcome {
    /// Quantity was > 1; decremented and subtotal scaled down.
    Decremented,
    /// Quantity was 1; the line item was deleted.
    LineDeleted,
    /// The line deleted was the last one; the cart is now empty.
    Emptied,
    /// No line item with that product; nothing changed.
    Missing,
}

/// Ordered sequence of line items, keyed uniquely by product ID.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::default(), |acc, item| acc + item.subtotal)
    }

    /// Quantity of a product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Add one unit of a product at the given unit price.
    ///
    /// An existing line is incremented and its subtotal recomputed as
    /// `unit_price * new_quantity`; otherwise a new line is appended.
    pub fn add(&mut self, product_id: &ProductId, unit_price: Money) {
        match self
            .items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
        {
            Some(item) => {
                item.quantity += 1;
                item.subtotal = unit_price * item.quantity;
            }
            None => self.items.push(LineItem {
                product_id: product_id.clone(),
                quantity: 1,
                subtotal: unit_price,
            }),
        }
    }

    /// Remove one unit of a product, scaling the subtotal proportionally.
    fn remove(&mut self, product_id: &ProductId) -> RemoveOutcome {
        let Some(index) = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)
        else {
            return RemoveOutcome::Missing;
        };

        let Some(item) = self.items.get_mut(index) else {
            return RemoveOutcome::Missing;
        };

        if item.quantity == 1 {
            self.items.remove(index);
            if self.items.is_empty() {
                RemoveOutcome::Emptied
            } else {
                RemoveOutcome::LineDeleted
            }
        } else {
            item.subtotal = item.subtotal - item.subtotal / item.quantity;
            item.quantity -= 1;
            RemoveOutcome::Decremented
        }
    }
}

/// Point-in-time cart summary published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartSnapshot {
    /// Total units across all line items.
    pub item_count: u32,
    /// Sum of all line subtotals.
    pub total: Money,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}

/// Keeps an in-memory cart and its persisted representation consistent.
///
/// Every effective mutation returns the new cart state in place, writes the
/// full cart through to the store (or deletes the entry when the cart
/// empties), and publishes a [`CartSnapshot`] to subscribers. A removal for
/// a product not in the cart is a silent no-op with no side effects.
pub struct CartReconciler<S: CartStore> {
    store: S,
    changed: watch::Sender<CartSnapshot>,
}

impl<S: CartStore> CartReconciler<S> {
    /// Create a reconciler writing through to the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        let (changed, _) = watch::channel(CartSnapshot::default());
        Self { store, changed }
    }

    /// Subscribe to cart-changed notifications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.changed.subscribe()
    }

    /// Access the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Hydrate a cart from the persisted store.
    ///
    /// An absent entry yields an empty cart; the persisted entry is only
    /// created on the first add.
    ///
    /// # Errors
    ///
    /// Returns an error if a persisted entry exists but cannot be decoded.
    pub fn load(&self) -> Result<Cart, StoreError> {
        Ok(self.store.read()?.unwrap_or_default())
    }

    /// Add one unit of a product to the cart and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the write-through fails; the in-memory cart is
    /// already updated at that point and the caller decides whether to retry.
    pub fn add_item(
        &mut self,
        cart: &mut Cart,
        product_id: &ProductId,
        unit_price: Money,
    ) -> Result<(), StoreError> {
        cart.add(product_id, unit_price);
        self.store.write(cart)?;
        self.notify(cart);
        Ok(())
    }

    /// Remove one unit of a product from the cart and persist the result.
    ///
    /// Removing the cart's last line item deletes the persisted entry
    /// entirely rather than writing an empty collection. Removing a product
    /// that is not in the cart is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write-through or entry delete fails.
    pub fn remove_item(
        &mut self,
        cart: &mut Cart,
        product_id: &ProductId,
    ) -> Result<(), StoreError> {
        match cart.remove(product_id) {
            RemoveOutcome::Missing => {
                warn!(product_id = %product_id, "remove for product not in cart");
                return Ok(());
            }
            RemoveOutcome::Emptied => self.store.clear()?,
            RemoveOutcome::Decremented | RemoveOutcome::LineDeleted => self.store.write(cart)?,
        }
        self.notify(cart);
        Ok(())
    }

    fn notify(&self, cart: &Cart) {
        // send_replace delivers even when no receiver is subscribed yet
        self.changed.send_replace(CartSnapshot::from(cart));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler() -> CartReconciler<CookieCartStore> {
        CartReconciler::new(CookieCartStore::new())
    }

    fn pid(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_repeated_adds_aggregate_one_line() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        let unit = Money::new(10.0);

        for _ in 0..4 {
            rec.add_item(&mut cart, &pid("p1"), unit).expect("add");
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&pid("p1")), 4);
        assert_eq!(cart.items()[0].subtotal, Money::new(40.0));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut rec = reconciler();
        let mut cart = Cart::new();

        rec.add_item(&mut cart, &pid("a"), Money::new(1.0)).expect("add");
        rec.add_item(&mut cart, &pid("b"), Money::new(2.0)).expect("add");
        rec.add_item(&mut cart, &pid("a"), Money::new(1.0)).expect("add");

        let ids: Vec<_> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_scales_subtotal_proportionally() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        let unit = Money::new(10.0);

        for _ in 0..3 {
            rec.add_item(&mut cart, &pid("p1"), unit).expect("add");
        }
        // {quantity: 3, subtotal: 30} -> remove once -> {quantity: 2, subtotal: 20}
        rec.remove_item(&mut cart, &pid("p1")).expect("remove");

        assert_eq!(cart.quantity_of(&pid("p1")), 2);
        assert_eq!(cart.items()[0].subtotal, Money::new(20.0));
    }

    #[test]
    fn test_remove_last_unit_deletes_line() {
        let mut rec = reconciler();
        let mut cart = Cart::new();

        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");
        rec.add_item(&mut cart, &pid("p2"), Money::new(5.0)).expect("add");
        rec.remove_item(&mut cart, &pid("p1")).expect("remove");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&pid("p1")), 0);
        // Another line remains, so the entry is still persisted
        assert!(rec.store().jar().contains(CART_COOKIE));
    }

    #[test]
    fn test_removing_only_line_clears_persisted_entry() {
        let mut rec = reconciler();
        let mut cart = Cart::new();

        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");
        assert!(rec.store().jar().contains(CART_COOKIE));

        rec.remove_item(&mut cart, &pid("p1")).expect("remove");

        assert!(cart.is_empty());
        // Entry deleted, not written as an empty collection
        assert!(!rec.store().jar().contains(CART_COOKIE));
    }

    #[test]
    fn test_remove_missing_product_is_a_no_op() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");

        let before = cart.clone();
        let mut watcher = rec.subscribe();
        watcher.mark_unchanged();

        rec.remove_item(&mut cart, &pid("ghost")).expect("remove");

        assert_eq!(cart, before);
        // No store write and no change signal
        assert!(!watcher.has_changed().expect("sender alive"));
    }

    #[test]
    fn test_write_through_after_every_mutation() {
        let mut rec = reconciler();
        let mut cart = Cart::new();

        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");
        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");

        let persisted = rec.store().read().expect("read").expect("entry present");
        assert_eq!(persisted, cart);

        rec.remove_item(&mut cart, &pid("p1")).expect("remove");
        let persisted = rec.store().read().expect("read").expect("entry present");
        assert_eq!(persisted, cart);
    }

    #[test]
    fn test_load_round_trip() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        rec.add_item(&mut cart, &pid("p1"), Money::new(7.25)).expect("add");
        rec.add_item(&mut cart, &pid("p2"), Money::new(3.0)).expect("add");

        let loaded = rec.load().expect("load");
        assert_eq!(loaded, cart);
    }

    #[test]
    fn test_load_absent_entry_is_empty_cart() {
        let rec = reconciler();
        assert!(rec.load().expect("load").is_empty());
    }

    #[test]
    fn test_observer_sees_snapshot() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        let watcher = rec.subscribe();

        rec.add_item(&mut cart, &pid("p1"), Money::new(10.0)).expect("add");
        rec.add_item(&mut cart, &pid("p2"), Money::new(2.5)).expect("add");

        let snapshot = *watcher.borrow();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total, Money::new(12.5));
    }

    #[test]
    fn test_subtotal_drift_stays_bounded() {
        // Proportional scaling accumulates floating-point error; after one
        // add/remove cycle the subtotal must stay within display precision
        // of the exact value.
        let mut rec = reconciler();
        let mut cart = Cart::new();
        let unit = Money::new(9.99);

        for _ in 0..7 {
            rec.add_item(&mut cart, &pid("p1"), unit).expect("add");
        }
        for _ in 0..5 {
            rec.remove_item(&mut cart, &pid("p1")).expect("remove");
        }

        assert_eq!(cart.quantity_of(&pid("p1")), 2);
        let exact = 9.99 * 2.0;
        let drift = (cart.items()[0].subtotal.amount() - exact).abs();
        assert!(drift < 1e-9, "drift {drift} exceeds tolerance");
    }

    #[test]
    fn test_quantity_never_reaches_zero_in_place() {
        let mut rec = reconciler();
        let mut cart = Cart::new();
        rec.add_item(&mut cart, &pid("p1"), Money::new(1.0)).expect("add");
        rec.remove_item(&mut cart, &pid("p1")).expect("remove");
        rec.remove_item(&mut cart, &pid("p1")).expect("remove again is no-op");

        assert!(cart.is_empty());
        assert!(cart.items().iter().all(|item| item.quantity >= 1));
    }
}
