//! Products

use std::{borrow::Borrow, fmt};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Catalog storage key
    pub struct ProductKey;
}

/// Opaque product identifier shared by the catalog and the cart.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Catalog product record
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Long-form description
    pub description: String,

    /// Category name
    pub category: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Average rating out of five
    pub rating: f32,

    /// Image URI
    pub image: String,

    /// Shown on the home screen
    pub featured: bool,
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name, unique within a catalog
    pub name: String,

    /// Optional blurb
    pub description: Option<String>,
}

/// The product details a cart line captures when it is first added.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Image URI
    pub image: String,
}

impl ProductRef {
    /// Creates a product reference.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money<'static, Currency>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}
