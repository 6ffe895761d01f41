//! Fixture Catalog

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use serde::Deserialize;
use slotmap::SlotMap;
use tracing::info;

use crate::{
    catalog::{Catalog, CatalogError, SearchQuery},
    money::parse_price,
    products::{Category, Product, ProductId, ProductKey},
};

const SAMPLE_YAML: &str = include_str!("../../fixtures/catalog/sample.yml");
const EXTENDED_SAMPLE_YAML: &str = include_str!("../../fixtures/catalog/extended.yml");

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    categories: Vec<CategoryFixture>,

    #[serde(default)]
    products: Vec<ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct CategoryFixture {
    name: String,

    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: ProductId,
    title: String,

    #[serde(default)]
    description: String,

    category: String,

    /// Product price (e.g., "24.99 USD")
    price: String,

    #[serde(default)]
    rating: f32,

    #[serde(default)]
    image: String,

    #[serde(default)]
    featured: bool,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        Ok(Product {
            price: parse_price(&fixture.price)?,
            id: fixture.id,
            title: fixture.title,
            description: fixture.description,
            category: fixture.category,
            rating: fixture.rating,
            image: fixture.image,
            featured: fixture.featured,
        })
    }
}

/// How to treat products that already exist when loading more data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnExisting {
    Reject,
    Skip,
}

/// In-memory catalog loaded from YAML fixtures.
#[derive(Debug, Default)]
pub struct FixtureCatalog {
    products: SlotMap<ProductKey, Product>,

    /// Product keys in load order
    order: Vec<ProductKey>,

    /// Product id -> `SlotMap` key
    product_keys: FxHashMap<ProductId, ProductKey>,

    categories: Vec<Category>,

    currency: Option<&'static Currency>,
}

impl FixtureCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid, a product id repeats, a
    /// product names an unknown category, or prices use more than one currency.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        catalog.load(yaml, OnExisting::Reject)?;

        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or for any reason given by
    /// [`FixtureCatalog::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// A catalog holding the bundled sample data.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is invalid.
    pub fn sample() -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        catalog.seed_sample_data()?;

        Ok(catalog)
    }

    /// Insert the bundled sample products. Safe to call repeatedly: categories and products
    /// that already exist are left alone.
    ///
    /// Returns the number of products inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is invalid or uses a different currency.
    pub fn seed_sample_data(&mut self) -> Result<usize, CatalogError> {
        let inserted = self.load(SAMPLE_YAML, OnExisting::Skip)?;

        info!(inserted, "seeded sample catalog data");

        Ok(inserted)
    }

    /// Insert the larger bundled sample set. Idempotent like
    /// [`FixtureCatalog::seed_sample_data`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is invalid or uses a different currency.
    pub fn seed_extended_sample_data(&mut self) -> Result<usize, CatalogError> {
        let inserted = self.load(EXTENDED_SAMPLE_YAML, OnExisting::Skip)?;

        info!(inserted, "seeded extended sample catalog data");

        Ok(inserted)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Products in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Validate a whole fixture, then apply it. On error the catalog is unchanged.
    fn load(&mut self, yaml: &str, on_existing: OnExisting) -> Result<usize, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut new_categories: Vec<Category> = Vec::new();

        for category in fixture.categories {
            let known = self.category(&category.name).is_some()
                || new_categories.iter().any(|staged| staged.name == category.name);

            if !known {
                new_categories.push(Category {
                    name: category.name,
                    description: category.description,
                });
            }
        }

        let mut currency = self.currency;
        let mut staged_ids: FxHashSet<ProductId> = FxHashSet::default();
        let mut new_products: Vec<Product> = Vec::new();

        for product_fixture in fixture.products {
            if self.product_keys.contains_key(&product_fixture.id)
                || staged_ids.contains(&product_fixture.id)
            {
                match on_existing {
                    OnExisting::Skip => continue,
                    OnExisting::Reject => {
                        return Err(CatalogError::DuplicateProduct(
                            product_fixture.id.to_string(),
                        ));
                    }
                }
            }

            let product: Product = product_fixture.try_into()?;

            let category_known = self.category(&product.category).is_some()
                || new_categories
                    .iter()
                    .any(|staged| staged.name == product.category);

            if !category_known {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.to_string(),
                    category: product.category,
                });
            }

            let product_currency = product.price.currency();

            match currency {
                Some(existing) if existing != product_currency => {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            staged_ids.insert(product.id.clone());
            new_products.push(product);
        }

        let inserted = new_products.len();

        self.categories.extend(new_categories);
        self.currency = currency;

        for product in new_products {
            self.insert_product(product);
        }

        Ok(inserted)
    }

    fn insert_product(&mut self, product: Product) {
        let id = product.id.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.product_keys.insert(id, key);
    }

    fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }
}

impl Catalog for FixtureCatalog {
    fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();

        categories.sort_by(|a, b| a.name.cmp(&b.name));

        categories
    }

    fn product(&self, id: &str) -> Result<&Product, CatalogError> {
        self.product_keys
            .get(id)
            .and_then(|key| self.products.get(*key))
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    fn products(&self, limit: usize) -> Vec<&Product> {
        self.iter().take(limit).collect()
    }

    fn featured(&self, limit: usize) -> Vec<&Product> {
        self.iter()
            .filter(|product| product.featured)
            .take(limit)
            .collect()
    }

    fn search(&self, query: &SearchQuery) -> Vec<&Product> {
        self.iter()
            .filter(|product| query.matches(product))
            .take(query.limit)
            .collect()
    }

    fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}
