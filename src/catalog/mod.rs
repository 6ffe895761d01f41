//! Catalog
//!
//! Read access to products and categories. The cart never talks to the catalog; callers look
//! products up here and hand a [`ProductRef`](crate::products::ProductRef) to the cart.

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    money::MoneyParseError,
    products::{Category, Product},
};

pub mod fixture;

pub use fixture::FixtureCatalog;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Money(#[from] MoneyParseError),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product id defined twice
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// Product refers to a category that does not exist
    #[error("Product {product} refers to unknown category {category}")]
    UnknownCategory {
        /// Product id
        product: String,
        /// Category name
        category: String,
    },

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// Keyword and category filter for [`Catalog::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive text matched against titles and descriptions; empty matches everything
    pub term: String,

    /// Category name, matched case-insensitively
    pub category: Option<String>,

    /// Maximum number of results
    pub limit: usize,
}

impl SearchQuery {
    /// Result limit used when none is given.
    pub const DEFAULT_LIMIT: usize = 50;

    /// Search all categories for `term`.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Restrict results to one category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether `product` satisfies the term and category filter.
    pub fn matches(&self, product: &Product) -> bool {
        let in_category = self
            .category
            .as_deref()
            .is_none_or(|category| {
                product.category.to_lowercase() == category.trim().to_lowercase()
            });

        if !in_category {
            return false;
        }

        let term = self.term.trim().to_lowercase();

        term.is_empty()
            || product.title.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new("")
    }
}

/// Source of product and category records.
pub trait Catalog {
    /// All categories, sorted by name.
    fn categories(&self) -> Vec<&Category>;

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has that id.
    fn product(&self, id: &str) -> Result<&Product, CatalogError>;

    /// Up to `limit` products, in catalog order.
    fn products(&self, limit: usize) -> Vec<&Product>;

    /// Up to `limit` featured products, in catalog order.
    fn featured(&self, limit: usize) -> Vec<&Product>;

    /// Products matching `query`, in catalog order, capped at `query.limit`.
    fn search(&self, query: &SearchQuery) -> Vec<&Product>;

    /// Currency shared by every product, if any product is loaded.
    fn currency(&self) -> Option<&'static Currency>;
}
