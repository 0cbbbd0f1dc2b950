//! Catalog
//!
//! The static product list and the listing view derived from it.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Availability, Product, ProductKey};

pub mod filters;
pub mod query;
pub mod sorting;

pub use filters::{Facet, FilterError, FilterState, FilterTag, PriceRange};
pub use query::ListingQuery;
pub use sorting::SortOrder;

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product is priced in another currency (product id, product currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Immutable, ordered product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    ids: FxHashMap<String, ProductKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            ids: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids or currency mismatches.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Append a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids or currency mismatches.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.ids.insert(id, key);

        Ok(key)
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Find a product by its id. `None` renders as a "not found" page.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.ids.get(id).and_then(|key| self.products.get(*key))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency of every product in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Distinct values of a facet, in the order they first appear in the catalog.
    ///
    /// Availability always lists every status, whether stocked or not.
    pub fn facet_values(&self, facet: Facet) -> Vec<&str> {
        if facet == Facet::Availability {
            return Availability::ALL
                .into_iter()
                .map(Availability::label)
                .collect();
        }

        let mut seen = FxHashSet::default();

        self.iter()
            .filter_map(|product| facet.value_of(product))
            .filter(|value| seen.insert(*value))
            .collect()
    }

    /// Whether a facet value exists in the catalog.
    pub fn has_facet_value(&self, facet: Facet, value: &str) -> bool {
        match facet {
            Facet::Availability => Availability::from_label(value).is_some(),
            _ => self
                .iter()
                .any(|product| facet.value_of(product) == Some(value)),
        }
    }

    /// Products matching the filters, ordered by the sort order.
    ///
    /// Pure: the same inputs always yield the same sequence.
    pub fn listing(&self, filters: &FilterState, sort: SortOrder) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .iter()
            .filter(|product| filters.matches(product))
            .collect();

        sort.sort(&mut products);

        products
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{EUR, GBP},
    };
    use testresult::TestResult;

    use crate::products::tests::product;

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        let mut scaled = product("p2", "One Piece", 14999);
        scaled.scale = Some("1/7".to_string());

        Ok(Catalog::with_products(
            [
                product("p1", "Naruto", 19999),
                scaled,
                product("p3", "Naruto", 4499),
            ],
            EUR,
        )?)
    }

    #[test]
    fn with_products_keeps_catalog_order() -> TestResult {
        let catalog = catalog()?;

        let ids: Vec<&str> = catalog.iter().map(|product| product.id.as_str()).collect();

        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::with_products(
            [product("p1", "Naruto", 100), product("p1", "Bleach", 200)],
            EUR,
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateProduct(id)) if id == "p1"
        ));
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let mut pounds = product("p1", "Naruto", 100);
        pounds.price = Money::from_minor(100, GBP);

        let result = Catalog::with_products([pounds], EUR);

        assert_eq!(
            result.err(),
            Some(CatalogError::CurrencyMismatch(
                "p1".to_string(),
                GBP.iso_alpha_code,
                EUR.iso_alpha_code
            ))
        );
    }

    #[test]
    fn find_returns_none_for_unknown_ids() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(catalog.find("p2").map(|p| p.franchise.as_str()), Some("One Piece"));
        assert!(catalog.find("missing").is_none());

        Ok(())
    }

    #[test]
    fn facet_values_are_distinct_in_catalog_order() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(catalog.facet_values(Facet::Franchise), vec!["Naruto", "One Piece"]);
        assert_eq!(catalog.facet_values(Facet::Scale), vec!["1/7"]);
        assert!(catalog.facet_values(Facet::Rarity).is_empty());
        assert_eq!(
            catalog.facet_values(Facet::Availability),
            vec!["En Stock", "Stock Limite", "Precommande"]
        );

        Ok(())
    }

    #[test]
    fn has_facet_value_checks_known_values() -> TestResult {
        let catalog = catalog()?;

        assert!(catalog.has_facet_value(Facet::Franchise, "Naruto"));
        assert!(!catalog.has_facet_value(Facet::Franchise, "Bleach"));
        assert!(catalog.has_facet_value(Facet::Availability, "Precommande"));

        Ok(())
    }

    #[test]
    fn listing_filters_then_sorts() -> TestResult {
        let catalog = catalog()?;
        let mut filters = FilterState::default();
        filters.select(Facet::Franchise, "Naruto");

        let ids: Vec<&str> = catalog
            .listing(&filters, SortOrder::PriceAscending)
            .iter()
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(ids, vec!["p3", "p1"]);

        Ok(())
    }

    #[test]
    fn listing_with_no_matches_is_empty() -> TestResult {
        let catalog = catalog()?;
        let mut filters = FilterState::default();
        filters.select(Facet::Rarity, "Secret Rare");

        assert!(catalog.listing(&filters, SortOrder::default()).is_empty());

        Ok(())
    }
}
