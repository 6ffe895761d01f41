//! Session scripts
//!
//! A session is a YAML list of cart actions, applied in order:
//!
//! ```yaml
//! - action: add
//!   product: fresh-fruit-box
//! - action: add_many
//!   product: berry-box
//!   quantity: 3
//! - action: update
//!   product: berry-box
//!   quantity: 1
//! - action: remove
//!   product: fresh-fruit-box
//! - action: clear
//! - action: checkout
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{CartObserver, CartStore},
    catalog::{Catalog, CatalogError},
    checkout::{Checkout, CheckoutError},
    products::{ProductId, ProductRef},
};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error reading a session file
    #[error("Failed to read session file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A product could not be resolved
    #[error("step {step}: {source}")]
    Catalog {
        /// Zero-based index of the failing action
        step: usize,
        /// Underlying catalog error
        source: CatalogError,
    },

    /// Checkout failed
    #[error("step {step}: {source}")]
    Checkout {
        /// Zero-based index of the failing action
        step: usize,
        /// Underlying checkout error
        source: CheckoutError,
    },
}

/// One user action against the cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Add one unit of a catalog product.
    Add {
        /// Product id
        product: ProductId,
    },

    /// Add several units of a catalog product, as from the product details screen.
    AddMany {
        /// Product id
        product: ProductId,
        /// Units to add
        quantity: u32,
    },

    /// Set a line's quantity; zero or less removes it.
    Update {
        /// Product id
        product: ProductId,
        /// New quantity
        quantity: i64,
    },

    /// Remove a line.
    Remove {
        /// Product id
        product: ProductId,
    },

    /// Empty the cart.
    Clear,

    /// Place an order for the cart's contents.
    Checkout,
}

/// An ordered list of actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Session {
    actions: Vec<Action>,
}

impl Session {
    /// Build a session from actions.
    pub fn new(actions: impl Into<Vec<Action>>) -> Self {
        Self {
            actions: actions.into(),
        }
    }

    /// Parse a session from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or names an unknown action.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SessionError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a session from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// The actions, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Apply every action in order, stopping at the first failure.
    ///
    /// Actions before the failing one stay applied.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Catalog`]: an add names a product the catalog does not have.
    /// - [`SessionError::Checkout`]: checkout failed, e.g. because the cart was empty.
    pub fn apply<C, O>(
        &self,
        catalog: &C,
        store: &mut CartStore<O>,
        checkout: &mut Checkout,
    ) -> Result<(), SessionError>
    where
        C: Catalog + ?Sized,
        O: CartObserver,
    {
        for (step, action) in self.actions.iter().enumerate() {
            debug!(step, ?action, "applying session action");

            match action {
                Action::Add { product } => {
                    store.add_item(resolve(catalog, product, step)?);
                }
                Action::AddMany { product, quantity } => {
                    store.add_items(resolve(catalog, product, step)?, *quantity);
                }
                Action::Update { product, quantity } => {
                    store.update_quantity(product.as_str(), *quantity);
                }
                Action::Remove { product } => store.remove_item(product.as_str()),
                Action::Clear => store.clear(),
                Action::Checkout => {
                    checkout
                        .checkout(store)
                        .map_err(|source| SessionError::Checkout { step, source })?;
                }
            }
        }

        Ok(())
    }
}

fn resolve<C: Catalog + ?Sized>(
    catalog: &C,
    id: &ProductId,
    step: usize,
) -> Result<ProductRef, SessionError> {
    catalog
        .product(id.as_str())
        .map(ProductRef::from)
        .map_err(|source| SessionError::Catalog { step, source })
}
