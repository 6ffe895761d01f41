//! Cart
//!
//! The cart holds one line per product in the order products were first added. Lines always
//! have a quantity of at least one: driving a quantity to zero removes the line. Mutators never
//! fail; unknown products and non-positive quantities are normal input with defined outcomes.

use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    pricing::{TotalPriceError, line_total, total_price},
    products::{ProductId, ProductRef},
};

pub mod observer;
pub mod store;

pub use observer::{CartObserver, NoopObserver};
pub use store::CartStore;

/// One distinct product held in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    id: ProductId,
    title: String,
    price: Money<'static, Currency>,
    image: String,
    quantity: u32,
}

impl CartLine {
    fn new(product: ProductRef) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// Product identifier
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name captured when the line was created
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price captured when the line was created
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Image URI captured when the line was created
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the amount does not fit in minor units.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        line_total(self.price, self.quantity)
    }
}

/// What a cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with the given quantity.
    Added(ProductId, u32),

    /// An existing line now has the given quantity.
    QuantityChanged(ProductId, u32),

    /// A line was removed.
    Removed(ProductId),

    /// Every line was removed.
    Cleared,
}

/// In-memory shopping cart
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add one unit of a product.
    ///
    /// The first add creates a line with quantity one and captures the title, price and image.
    /// Later adds only bump the quantity. Returns `None` if the quantity is already at its
    /// maximum.
    pub fn add_item(&mut self, product: ProductRef) -> Option<CartChange> {
        self.add_items(product, 1)
    }

    /// Add `count` units of a product, as if [`Cart::add_item`] were called `count` times.
    ///
    /// Returns `None` when `count` is zero or the quantity is already at its maximum.
    pub fn add_items(&mut self, product: ProductRef, count: u32) -> Option<CartChange> {
        if count == 0 {
            return None;
        }

        let id = product.id.clone();

        let change = match self.line_mut(id.as_str()) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(count);

                if quantity == line.quantity {
                    return None;
                }

                line.quantity = quantity;
                CartChange::QuantityChanged(id, quantity)
            }
            None => {
                let mut line = CartLine::new(product);
                line.quantity = count;
                self.lines.push(line);
                CartChange::Added(id, count)
            }
        };

        debug!(?change, "added {count} units to cart");

        Some(change)
    }

    /// Set a line's quantity. Non-positive quantities remove the line.
    ///
    /// Returns `None` if no line matches `id` or the quantity is unchanged.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Option<CartChange> {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self.line_mut(id)?;

        if line.quantity == quantity {
            return None;
        }

        line.quantity = quantity;

        debug!(product = %line.id, quantity, "updated cart line quantity");

        Some(CartChange::QuantityChanged(line.id.clone(), quantity))
    }

    /// Remove the line for `id`, if any.
    pub fn remove_item(&mut self, id: &str) -> Option<CartChange> {
        let position = self.lines.iter().position(|line| line.id.as_str() == id)?;
        let line = self.lines.remove(position);

        debug!(product = %line.id, "removed cart line");

        Some(CartChange::Removed(line.id))
    }

    /// Remove every line. Returns `None` if the cart was already empty.
    pub fn clear(&mut self) -> Option<CartChange> {
        if self.lines.is_empty() {
            return None;
        }

        debug!(lines = self.lines.len(), "cleared cart");

        self.lines.clear();

        Some(CartChange::Cleared)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line is priced in another currency or the sum overflows.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        let line_totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<Vec<_>, _>>()?;

        total_price(self.currency, line_totals)
    }

    /// Get the line for a product.
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id.as_str() == id)
    }

    fn line_mut(&mut self, id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id.as_str() == id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, price_minor: i64) -> ProductRef {
        ProductRef::new(
            id,
            format!("Product {id}"),
            Money::from_minor(price_minor, USD),
            format!("https://example.test/{id}.jpg"),
        )
    }

    #[test]
    fn new_cart_is_empty() -> TestResult {
        let cart = Cart::new(USD);

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total()?, Money::from_minor(0, USD));
        assert_eq!(cart.currency(), USD);

        Ok(())
    }

    #[test]
    fn add_item_creates_line_with_quantity_one() {
        let mut cart = Cart::new(USD);

        let change = cart.add_item(product("apple", 75));

        assert_eq!(change, Some(CartChange::Added(ProductId::from("apple"), 1)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line("apple").map(CartLine::quantity), Some(1));
    }

    #[test]
    fn repeated_adds_increment_and_keep_first_metadata() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("apple", 75));
        cart.add_item(ProductRef::new(
            "apple",
            "Renamed Apple",
            Money::from_minor(999, USD),
            "https://example.test/other.jpg",
        ));
        let change = cart.add_item(product("apple", 75));

        assert_eq!(
            change,
            Some(CartChange::QuantityChanged(ProductId::from("apple"), 3))
        );

        let line = cart.line("apple");
        assert_eq!(line.map(CartLine::quantity), Some(3));
        assert_eq!(line.map(CartLine::title), Some("Product apple"));
        assert_eq!(line.map(CartLine::price), Some(Money::from_minor(75, USD)));
        assert_eq!(
            line.map(CartLine::image),
            Some("https://example.test/apple.jpg")
        );
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn add_items_matches_repeated_add_item() -> TestResult {
        let mut bulk = Cart::new(USD);
        let mut single = Cart::new(USD);

        bulk.add_items(product("bread", 220), 3);
        for _ in 0..3 {
            single.add_item(product("bread", 220));
        }

        assert_eq!(bulk.lines(), single.lines());
        assert_eq!(bulk.total()?, single.total()?);

        Ok(())
    }

    #[test]
    fn add_items_zero_is_noop() {
        let mut cart = Cart::new(USD);

        assert_eq!(cart.add_items(product("bread", 220), 0), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_items_to_existing_line_reports_quantity_change() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("bread", 220));
        let change = cart.add_items(product("bread", 220), 2);

        assert_eq!(
            change,
            Some(CartChange::QuantityChanged(ProductId::from("bread"), 3))
        );
    }

    #[test]
    fn adds_at_maximum_quantity_report_nothing() {
        let mut cart = Cart::new(USD);

        cart.add_items(product("rice", 180), u32::MAX);

        assert_eq!(cart.add_item(product("rice", 180)), None);
        assert_eq!(cart.add_items(product("rice", 180), 5), None);
        assert_eq!(cart.line("rice").map(CartLine::quantity), Some(u32::MAX));
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn add_items_saturates_below_maximum() {
        let mut cart = Cart::new(USD);

        cart.add_items(product("rice", 180), u32::MAX - 1);

        assert_eq!(
            cart.add_items(product("rice", 180), 10),
            Some(CartChange::QuantityChanged(ProductId::from("rice"), u32::MAX))
        );
    }

    #[test]
    fn lines_keep_insertion_order_across_updates() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));
        cart.add_item(product("b", 100));
        cart.add_item(product("c", 100));
        cart.update_quantity("a", 5);
        cart.add_item(product("b", 100));

        let ids: Vec<&str> = cart.iter().map(|line| line.id().as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn update_quantity_sets_exact_value() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));
        let change = cart.update_quantity("a", 7);

        assert_eq!(
            change,
            Some(CartChange::QuantityChanged(ProductId::from("a"), 7))
        );
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn update_quantity_to_same_value_reports_nothing() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));

        assert_eq!(cart.update_quantity("a", 1), None);
    }

    #[test]
    fn update_quantity_zero_is_remove() {
        let mut updated = Cart::new(USD);
        let mut removed = Cart::new(USD);

        for cart in [&mut updated, &mut removed] {
            cart.add_item(product("a", 100));
            cart.add_item(product("b", 200));
        }

        let update_change = updated.update_quantity("a", 0);
        let remove_change = removed.remove_item("a");

        assert_eq!(update_change, remove_change);
        assert_eq!(updated.lines(), removed.lines());
    }

    #[test]
    fn update_quantity_negative_removes_line() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));
        cart.update_quantity("a", -3);

        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));

        assert_eq!(cart.update_quantity("missing", 4), None);
        assert_eq!(cart.update_quantity("missing", 0), None);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn update_quantity_clamps_to_u32_max() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 1));
        cart.update_quantity("a", i64::MAX);

        assert_eq!(cart.line("a").map(CartLine::quantity), Some(u32::MAX));
    }

    #[test]
    fn remove_item_is_idempotent() {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));
        cart.add_item(product("b", 200));

        assert_eq!(
            cart.remove_item("a"),
            Some(CartChange::Removed(ProductId::from("a")))
        );

        let after_first = cart.lines().to_vec();

        assert_eq!(cart.remove_item("a"), None);
        assert_eq!(cart.lines(), after_first.as_slice());
    }

    #[test]
    fn clear_empties_cart_and_is_idempotent() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 100));
        cart.add_items(product("b", 200), 4);

        assert_eq!(cart.clear(), Some(CartChange::Cleared));
        assert_eq!(cart.clear(), None);
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn totals_follow_the_documented_scenario() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item(product("a", 1000));
        cart.add_item(product("a", 1000));
        cart.add_item(product("b", 500));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total()?, Money::from_minor(2500, USD));

        cart.update_quantity("a", 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total()?, Money::from_minor(1500, USD));

        cart.remove_item("b");
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total()?, Money::from_minor(1000, USD));

        cart.clear();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn total_with_foreign_currency_line_errors() {
        let mut cart = Cart::new(USD);

        cart.add_item(ProductRef::new("tea", "Tea", Money::from_minor(300, GBP), ""));

        assert!(matches!(cart.total(), Err(TotalPriceError::Money(_))));
    }

    #[test]
    fn line_total_uses_quantity() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_items(product("a", 125), 4);

        let total = cart.line("a").map(CartLine::total).transpose()?;

        assert_eq!(total, Some(Money::from_minor(500, USD)));

        Ok(())
    }
}
