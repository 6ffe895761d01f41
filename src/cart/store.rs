//! Cart Store

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{Cart, CartChange, CartLine, CartObserver, NoopObserver},
    pricing::TotalPriceError,
    products::ProductRef,
};

/// Owns the session's cart and reports every effective change to an observer.
///
/// The store is created once per session and handed to whatever needs it by reference;
/// there is no global cart. Observers run inside the mutating call, so by the time a
/// mutator returns every observer has seen the new state.
#[derive(Debug)]
pub struct CartStore<O: CartObserver = NoopObserver> {
    cart: Cart,
    observer: O,
}

impl CartStore<NoopObserver> {
    /// Create an unobserved store with an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_observer(currency, NoopObserver)
    }
}

impl<O: CartObserver> CartStore<O> {
    /// Create a store with an empty cart and the given observer.
    pub fn with_observer(currency: &'static Currency, observer: O) -> Self {
        Self {
            cart: Cart::new(currency),
            observer,
        }
    }

    /// Add one unit of a product.
    pub fn add_item(&mut self, product: ProductRef) {
        let change = self.cart.add_item(product);

        self.notify(change);
    }

    /// Add `count` units of a product in one step.
    pub fn add_items(&mut self, product: ProductRef, count: u32) {
        let change = self.cart.add_items(product, count);

        self.notify(change);
    }

    /// Set a line's quantity; zero or less removes it. Unknown products are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let change = self.cart.update_quantity(id, quantity);

        self.notify(change);
    }

    /// Remove a product's line, if present.
    pub fn remove_item(&mut self, id: &str) {
        let change = self.cart.remove_item(id);

        self.notify(change);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        let change = self.cart.clear();

        self.notify(change);
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Cart subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if money arithmetic fails.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        self.cart.total()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Read-only view of the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The observer, e.g. to inspect what it recorded.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Consume the store, returning the cart and observer.
    pub fn into_parts(self) -> (Cart, O) {
        (self.cart, self.observer)
    }

    fn notify(&mut self, change: Option<CartChange>) {
        if let Some(change) = change {
            self.observer.on_change(&self.cart, &change);
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        changes: Vec<CartChange>,
        counts: Vec<u64>,
        totals: Vec<i64>,
    }

    impl CartObserver for Recorder {
        fn on_change(&mut self, cart: &Cart, change: &CartChange) {
            self.changes.push(change.clone());
            self.counts.push(cart.item_count());
            self.totals
                .push(cart.total().map_or(-1, |total| total.to_minor_units()));
        }
    }

    fn product(id: &str, price_minor: i64) -> ProductRef {
        ProductRef::new(id, id.to_uppercase(), Money::from_minor(price_minor, USD), "")
    }

    #[test]
    fn observer_sees_each_effective_change_with_fresh_totals() {
        let mut store = CartStore::with_observer(USD, Recorder::default());

        store.add_item(product("a", 1000));
        store.add_item(product("a", 1000));
        store.add_item(product("b", 500));
        store.update_quantity("a", 1);
        store.remove_item("b");
        store.clear();

        let recorder = store.observer();

        assert_eq!(
            recorder.changes,
            vec![
                CartChange::Added(ProductId::from("a"), 1),
                CartChange::QuantityChanged(ProductId::from("a"), 2),
                CartChange::Added(ProductId::from("b"), 1),
                CartChange::QuantityChanged(ProductId::from("a"), 1),
                CartChange::Removed(ProductId::from("b")),
                CartChange::Cleared,
            ]
        );
        assert_eq!(recorder.counts, vec![1, 2, 3, 2, 1, 0]);
        assert_eq!(recorder.totals, vec![1000, 2000, 2500, 1500, 1000, 0]);
    }

    #[test]
    fn noops_are_not_reported() {
        let mut store = CartStore::with_observer(USD, Recorder::default());

        store.remove_item("missing");
        store.update_quantity("missing", 3);
        store.update_quantity("missing", 0);
        store.add_items(product("a", 100), 0);
        store.clear();

        assert!(store.observer().changes.is_empty());
    }

    #[test]
    fn adds_past_maximum_quantity_are_not_reported() {
        let mut store = CartStore::with_observer(USD, Recorder::default());

        store.add_items(product("a", 1), u32::MAX);
        store.add_item(product("a", 1));
        store.add_items(product("a", 1), 2);

        assert_eq!(
            store.observer().changes,
            vec![CartChange::Added(ProductId::from("a"), u32::MAX)]
        );
    }

    #[test]
    fn closure_observer_counts_changes() {
        let mut calls = 0_usize;

        {
            let mut store = CartStore::with_observer(USD, |_: &Cart, _: &CartChange| calls += 1);

            store.add_items(product("a", 100), 3);
            store.remove_item("a");
            store.remove_item("a");
        }

        assert_eq!(calls, 2);
    }

    #[test]
    fn unobserved_store_tracks_totals() -> TestResult {
        let mut store = CartStore::new(USD);

        store.add_items(product("milk", 150), 2);
        store.add_item(product("eggs", 320));

        assert_eq!(store.item_count(), 3);
        assert_eq!(store.total()?, Money::from_minor(620, USD));
        assert_eq!(store.lines().len(), 2);

        let (cart, _observer) = store.into_parts();
        assert_eq!(cart.len(), 2);

        Ok(())
    }
}
