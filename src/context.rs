//! Storefront Context
//!
//! Owns the catalog, the search lists and the session cart, and hands them to whatever
//! needs them.

use std::num::NonZeroU32;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, ListingQuery},
    checkout::Checkout,
    products::Product,
    search::{SearchIndex, SearchResults},
};

/// Session-lifetime storefront state.
#[derive(Debug)]
pub struct Storefront {
    /// Static product catalog
    pub catalog: Catalog,

    /// Category and franchise search lists
    pub search: SearchIndex,

    /// Session cart
    pub cart: Cart,
}

impl Storefront {
    /// Assemble a storefront from its parts.
    #[must_use]
    pub fn new(catalog: Catalog, search: SearchIndex, cart: Cart) -> Self {
        Self {
            catalog,
            search,
            cart,
        }
    }

    /// A storefront with the given catalog and an empty cart.
    #[must_use]
    pub fn with_catalog(catalog: Catalog, search: SearchIndex) -> Self {
        let cart = Cart::new(catalog.currency());

        Self::new(catalog, search, cart)
    }

    /// The catalogue listing for a query string such as `?franchise=Pokemon&sort=note`.
    pub fn listing(&self, query: &str) -> Vec<&Product> {
        let ListingQuery { filters, sort } = ListingQuery::parse(query, &self.catalog);

        self.catalog.listing(&filters, sort)
    }

    /// Autocomplete suggestions.
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        self.search.search(&self.catalog, query)
    }

    /// Add a catalog product to the cart by id.
    ///
    /// Returns the line's new quantity, or `None` if no product has that id.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart rejects the product.
    pub fn add_to_cart(&mut self, id: &str) -> Result<Option<NonZeroU32>, CartError> {
        let Some(product) = self.catalog.find(id) else {
            tracing::debug!(id, "product not found");

            return Ok(None);
        };

        self.cart.add_item(product).map(Some)
    }

    /// Start a checkout from a snapshot of the cart and close the cart panel.
    pub fn begin_checkout(&mut self) -> Checkout {
        self.cart.set_open(false);

        Checkout::from_cart(&self.cart)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::products::tests::product;

    use super::*;

    fn storefront() -> TestResult<Storefront> {
        let mut popular = product("p2", "Pokemon", 599);
        popular.popularity = 90;

        let catalog = Catalog::with_products(
            [product("p1", "Naruto", 19999), popular, product("p3", "Pokemon", 1499)],
            EUR,
        )?;

        Ok(Storefront::with_catalog(catalog, SearchIndex::default()))
    }

    #[test]
    fn listing_applies_query_parameters() -> TestResult {
        let storefront = storefront()?;

        let ids: Vec<&str> = storefront
            .listing("?franchise=Pokemon&sort=prix-desc")
            .iter()
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(ids, vec!["p3", "p2"]);

        Ok(())
    }

    #[test]
    fn add_to_cart_ignores_unknown_ids() -> TestResult {
        let mut storefront = storefront()?;

        assert_eq!(storefront.add_to_cart("missing")?, None);
        assert!(storefront.cart.is_empty());

        assert_eq!(storefront.add_to_cart("p1")?, NonZeroU32::new(1));
        assert_eq!(storefront.add_to_cart("p1")?, NonZeroU32::new(2));
        assert_eq!(storefront.cart.len(), 1);

        Ok(())
    }

    #[test]
    fn begin_checkout_snapshots_the_cart() -> TestResult {
        let mut storefront = storefront()?;

        storefront.add_to_cart("p2")?;

        let checkout = storefront.begin_checkout();

        assert!(!storefront.cart.is_open());
        assert_eq!(checkout.lines(), storefront.cart.lines());

        storefront.cart.clear();

        assert_eq!(checkout.lines().len(), 1);

        Ok(())
    }

    #[test]
    fn search_covers_catalog_products() -> TestResult {
        let storefront = storefront()?;

        assert_eq!(storefront.search("pokémon").products.len(), 2);

        Ok(())
    }
}
