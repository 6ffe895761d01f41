//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartChange, CartLine, CartObserver, CartStore, NoopObserver,
        observer::TracingObserver,
    },
    catalog::{Catalog, CatalogError, FixtureCatalog, SearchQuery},
    checkout::{Checkout, CheckoutError, Order, OrderStatus, OrderSummary},
    config::{CheckoutConfig, ConfigError},
    money::{MoneyParseError, parse_percentage, parse_price},
    pricing::TotalPriceError,
    products::{Category, Product, ProductId, ProductRef},
    receipt::{ReceiptError, write_cart, write_order},
    session::{Action, Session, SessionError},
};
