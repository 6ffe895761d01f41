use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rusty_money::iso::USD;
use trolley::{
    cart::{CartStore, observer::TracingObserver},
    catalog::{Catalog, FixtureCatalog, SearchQuery},
    checkout::{Checkout, OrderSummary},
    config::CheckoutConfig,
    products::Product,
    receipt::{write_cart, write_order},
    session::Session,
};

pub(crate) mod logging;

use logging::LoggingConfig;

#[derive(Debug, Parser)]
#[command(name = "trolley", about = "Grocery cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Catalog YAML file; defaults to the bundled sample data
    #[arg(long, env = "TROLLEY_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Checkout config YAML file (delivery fee and tax rate)
    #[arg(long, env = "TROLLEY_CHECKOUT_CONFIG", global = true)]
    checkout_config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List categories
    Categories,

    /// List products, optionally only featured ones
    Products(ProductsArgs),

    /// Search products by keyword and category
    Search(SearchArgs),

    /// Apply a session script to a fresh cart and print the result
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct ProductsArgs {
    /// Only featured products
    #[arg(long)]
    featured: bool,

    /// Maximum number of products
    #[arg(long, default_value_t = SearchQuery::DEFAULT_LIMIT)]
    limit: usize,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Text to match against titles and descriptions
    term: Option<String>,

    /// Category name
    #[arg(long)]
    category: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = SearchQuery::DEFAULT_LIMIT)]
    limit: usize,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Session YAML file
    session: PathBuf,
}

impl Cli {
    pub(crate) fn run(self) -> Result<()> {
        let catalog = self.sources.load_catalog()?;
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Categories => {
                for category in catalog.categories() {
                    match &category.description {
                        Some(description) => writeln!(out, "{} - {description}", category.name)?,
                        None => writeln!(out, "{}", category.name)?,
                    }
                }
            }
            Commands::Products(args) => {
                let products = if args.featured {
                    catalog.featured(args.limit)
                } else {
                    catalog.products(args.limit)
                };

                write_products(&mut out, &products)?;
            }
            Commands::Search(args) => {
                let mut query =
                    SearchQuery::new(args.term.unwrap_or_default()).with_limit(args.limit);

                if let Some(category) = args.category {
                    query = query.in_category(category);
                }

                write_products(&mut out, &catalog.search(&query))?;
            }
            Commands::Run(args) => {
                let config = self.sources.load_checkout_config(&catalog)?;
                run_session(&mut out, &catalog, config, &args.session)?;
            }
        }

        Ok(())
    }
}

impl SourceArgs {
    fn load_catalog(&self) -> Result<FixtureCatalog> {
        match &self.catalog {
            Some(path) => FixtureCatalog::from_path(path)
                .with_context(|| format!("failed to load catalog {}", path.display())),
            None => {
                let mut catalog = FixtureCatalog::sample()?;
                catalog.seed_extended_sample_data()?;

                Ok(catalog)
            }
        }
    }

    fn load_checkout_config(&self, catalog: &FixtureCatalog) -> Result<CheckoutConfig> {
        match &self.checkout_config {
            Some(path) => CheckoutConfig::from_path(path)
                .with_context(|| format!("failed to load checkout config {}", path.display())),
            None => Ok(CheckoutConfig::for_currency(
                catalog.currency().unwrap_or(USD),
            )),
        }
    }
}

fn write_products(out: &mut impl Write, products: &[&Product]) -> Result<()> {
    if products.is_empty() {
        writeln!(out, "No products found")?;
    }

    for product in products {
        writeln!(
            out,
            "{:<20} {:<24} {:>10}  {}",
            product.id, product.title, product.price, product.category
        )?;
    }

    Ok(())
}

fn run_session(
    out: &mut impl Write,
    catalog: &FixtureCatalog,
    config: CheckoutConfig,
    path: &Path,
) -> Result<()> {
    let session = Session::from_path(path)
        .with_context(|| format!("failed to load session {}", path.display()))?;

    let currency = catalog.currency().unwrap_or(USD);
    let mut store = CartStore::with_observer(currency, TracingObserver);
    let mut checkout = Checkout::new(config);

    session
        .apply(catalog, &mut store, &mut checkout)
        .context("session failed")?;

    for order in checkout.orders() {
        write_order(&mut *out, order)?;
        writeln!(out)?;
    }

    let summary = OrderSummary::from_cart(store.cart(), checkout.config())?;
    write_cart(&mut *out, store.cart(), &summary)?;

    Ok(())
}
