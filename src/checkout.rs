//! Checkout
//!
//! Payment is out of scope: checking out summarises the cart, records an order and empties
//! the cart. Nothing is charged.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLine, CartObserver, CartStore},
    config::CheckoutConfig,
    pricing::{TotalPriceError, percent_of_minor, total_price},
};

/// Errors that can occur during checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing in the cart to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// No order has the given number.
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// Error calculating the order totals.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),
}

/// Price breakdown shown before confirming an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    /// Units in the cart
    pub item_count: u64,

    /// Sum of line totals
    pub subtotal: Money<'static, Currency>,

    /// Flat delivery fee
    pub delivery_fee: Money<'static, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'static, Currency>,

    /// Subtotal plus delivery fee plus tax
    pub total: Money<'static, Currency>,
}

impl OrderSummary {
    /// Summarise a cart using the configured fee and tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the cart total cannot be computed or the delivery fee is
    /// in a different currency from the cart.
    pub fn from_cart(cart: &Cart, config: &CheckoutConfig) -> Result<Self, TotalPriceError> {
        let currency = cart.currency();
        let subtotal = cart.total()?;
        let tax = Money::from_minor(
            percent_of_minor(&config.tax_rate, subtotal.to_minor_units())?,
            currency,
        );
        let total = total_price(currency, [subtotal, config.delivery_fee, tax])?;

        Ok(Self {
            item_count: cart.item_count(),
            subtotal,
            delivery_fee: config.delivery_fee,
            tax,
            total,
        })
    }
}

/// Fulfilment state of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Placed, not yet shipped
    Processing,

    /// Out for delivery
    InTransit,

    /// Delivered
    Delivered,
}

impl OrderStatus {
    /// The next state; delivered orders stay delivered.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            OrderStatus::Processing => OrderStatus::InTransit,
            OrderStatus::InTransit | OrderStatus::Delivered => OrderStatus::Delivered,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Delivered => "Delivered",
        })
    }
}

/// A confirmed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Sequential order number, starting at 1
    pub number: u64,

    /// Cart lines at the time of checkout
    pub lines: Vec<CartLine>,

    /// Price breakdown at the time of checkout
    pub summary: OrderSummary,

    /// Fulfilment state
    pub status: OrderStatus,
}

/// Places orders from a cart and keeps the session's order history.
#[derive(Debug)]
pub struct Checkout {
    config: CheckoutConfig,
    orders: Vec<Order>,
}

impl Checkout {
    /// Create a checkout with no order history.
    #[must_use]
    pub fn new(config: CheckoutConfig) -> Self {
        Self {
            config,
            orders: Vec::new(),
        }
    }

    /// Summarise the cart without placing an order.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the totals cannot be computed.
    pub fn summary(&self, cart: &Cart) -> Result<OrderSummary, TotalPriceError> {
        OrderSummary::from_cart(cart, &self.config)
    }

    /// Place an order for everything in the cart, then clear the cart.
    ///
    /// The cart is left untouched if this returns an error.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::TotalPrice`]: the totals cannot be computed.
    pub fn checkout<O: CartObserver>(
        &mut self,
        store: &mut CartStore<O>,
    ) -> Result<&Order, CheckoutError> {
        let cart = store.cart();

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = self.summary(cart)?;
        let number = self.next_order_number();

        info!(
            order = number,
            items = summary.item_count,
            total = %summary.total,
            "placed order"
        );

        self.orders.push(Order {
            number,
            lines: cart.lines().to_vec(),
            summary,
            status: OrderStatus::Processing,
        });

        store.clear();

        self.orders.last().ok_or(CheckoutError::OrderNotFound(number))
    }

    /// Move an order to its next fulfilment state.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::OrderNotFound`] if no order has that number.
    pub fn advance(&mut self, number: u64) -> Result<OrderStatus, CheckoutError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.number == number)
            .ok_or(CheckoutError::OrderNotFound(number))?;

        order.status = order.status.next();

        Ok(order.status)
    }

    /// Find an order by number.
    pub fn order(&self, number: u64) -> Option<&Order> {
        self.orders.iter().find(|order| order.number == number)
    }

    /// Placed orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The configured fee and tax.
    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    fn next_order_number(&self) -> u64 {
        self.orders.last().map_or(1, |order| order.number + 1)
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new(CheckoutConfig::default())
    }
}
