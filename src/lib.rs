//! Trolley
//!
//! Trolley is an in-memory grocery shopping cart: one line per product, quantities that never
//! drop below one, and totals derived on demand. Around the cart sit a fixture-backed product
//! catalog, checkout summaries with delivery fee and tax, and a small session scripting format.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
