//! Cart Observer

use tracing::{info, warn};

use crate::cart::{Cart, CartChange};

/// Receives every effective cart change, synchronously, after it has been applied.
///
/// Observers see the cart in its new state and can read derived values such as
/// [`Cart::item_count`] and [`Cart::total`] directly. Mutations that change nothing
/// (unknown product, already empty cart) are not reported.
///
/// Any `FnMut(&Cart, &CartChange)` closure is an observer.
pub trait CartObserver {
    /// Called once per applied change.
    fn on_change(&mut self, cart: &Cart, change: &CartChange);
}

impl<F> CartObserver for F
where
    F: FnMut(&Cart, &CartChange),
{
    fn on_change(&mut self, cart: &Cart, change: &CartChange) {
        self(cart, change);
    }
}

/// No-op observer for unobserved carts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_change(&mut self, _: &Cart, _: &CartChange) {}
}

/// Logs the cart badge count and subtotal after every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_change(&mut self, cart: &Cart, change: &CartChange) {
        match cart.total() {
            Ok(total) => info!(
                ?change,
                item_count = cart.item_count(),
                %total,
                "cart changed"
            ),
            Err(error) => warn!(
                ?change,
                item_count = cart.item_count(),
                %error,
                "cart changed but total is unavailable"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};

    use crate::products::{ProductId, ProductRef};

    use super::*;

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        let mut cart = Cart::new(USD);

        {
            let mut observer = |cart: &Cart, change: &CartChange| {
                seen.push((change.clone(), cart.item_count()));
            };

            let change = cart.add_item(ProductRef::new(
                "kale",
                "Kale",
                Money::from_minor(199, USD),
                "",
            ));

            if let Some(change) = change {
                observer.on_change(&cart, &change);
            }
        }

        assert_eq!(seen, vec![(CartChange::Added(ProductId::from("kale"), 1), 1)]);
    }

    #[test]
    fn noop_observer_accepts_changes() {
        let cart = Cart::new(USD);

        NoopObserver.on_change(&cart, &CartChange::Cleared);
        TracingObserver.on_change(&cart, &CartChange::Cleared);

        assert!(cart.is_empty());
    }
}
