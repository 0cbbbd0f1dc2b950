//! Fixtures
//!
//! YAML files under a base directory: `catalog/<name>.yml` holds the products and the
//! search lists, `carts/<name>.yml` holds a starting cart that references them.

use std::{fs, num::NonZeroU32, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError},
    context::Storefront,
    fixtures::{carts::CartFixture, products::CatalogFixture},
    products::Product,
    search::{SearchCategory, SearchFranchise, SearchIndex},
};

pub mod carts;
pub mod products;

/// Default directory holding fixture sets.
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid rating
    #[error("Invalid rating, expected 0 to 5: {0}")]
    InvalidRating(String),

    /// Invalid date
    #[error("Invalid date, expected YYYY-MM-DD: {0}")]
    InvalidDate(String),

    /// Unknown availability label
    #[error("Unknown availability: {0}")]
    UnknownAvailability(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart line with a zero quantity
    #[error("Cart line for {0} has a zero quantity")]
    ZeroQuantity(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog creation error
    #[error("Failed to create catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products, in the order they were loaded
    products: Vec<Product>,

    /// Search lists
    categories: Vec<SearchCategory>,
    franchises: Vec<SearchFranchise>,

    /// Starting cart
    cart_lines: Vec<CartLine>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_BASE_PATH)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            categories: Vec::new(),
            franchises: Vec::new(),
            cart_lines: Vec::new(),
            currency: None,
        }
    }

    /// Load products and search lists from a catalog fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;
            let currency = product.price.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.push(product);
        }

        self.categories
            .extend(fixture.categories.into_iter().map(SearchCategory::from));

        self.franchises
            .extend(fixture.franchises.into_iter().map(SearchFranchise::from));

        tracing::debug!(
            name,
            products = self.products.len(),
            categories = self.categories.len(),
            franchises = self.franchises.len(),
            "loaded catalog fixture"
        );

        Ok(self)
    }

    /// Load a starting cart whose lines reference loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a referenced product
    /// doesn't exist, or if a quantity is zero.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line_fixture in fixture.lines {
            let product = self.product(&line_fixture.product)?;

            let quantity = NonZeroU32::new(line_fixture.quantity)
                .ok_or_else(|| FixtureError::ZeroQuantity(line_fixture.product.clone()))?;

            let line = CartLine::new(
                product.id.clone(),
                product.name.clone(),
                product.franchise.clone(),
                product.price,
                quantity,
            );

            self.cart_lines.push(line);
        }

        tracing::debug!(name, lines = self.cart_lines.len(), "loaded cart fixture");

        Ok(self)
    }

    /// Load a complete fixture set (catalog and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_cart(name)?;

        Ok(fixture)
    }

    /// Get a loaded product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product, FixtureError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Get all loaded products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get the starting cart lines
    pub fn cart_lines(&self) -> &[CartLine] {
        &self.cart_lines
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Create a catalog from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or two products share an id.
    pub fn catalog(&self) -> Result<Catalog, FixtureError> {
        Ok(Catalog::with_products(
            self.products.iter().cloned(),
            self.currency()?,
        )?)
    }

    /// Create a search index from the loaded categories and franchises
    pub fn search_index(&self) -> SearchIndex {
        SearchIndex::new(self.categories.clone(), self.franchises.clone())
    }

    /// Create a cart from the loaded cart lines
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded.
    pub fn cart(&self) -> Result<Cart, FixtureError> {
        Ok(Cart::with_lines(
            self.cart_lines.iter().cloned(),
            self.currency()?,
        )?)
    }

    /// Assemble the storefront context from everything loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or cart cannot be built.
    pub fn into_storefront(self) -> Result<Storefront, FixtureError> {
        let catalog = self.catalog()?;
        let search = self.search_index();
        let cart = self.cart()?;

        Ok(Storefront::new(catalog, search, cart))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
