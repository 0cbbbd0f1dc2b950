//! Listing sort orders

use std::{cmp::Ordering, fmt};

use crate::products::Product;

/// Order of the product listing.
///
/// Sorting is stable, so products comparing equal keep their catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Most popular first; the default listing.
    #[default]
    Relevance,

    /// Cheapest first.
    PriceAscending,

    /// Most expensive first.
    PriceDescending,

    /// Most recently added first.
    Newest,

    /// Most popular first.
    Popularity,

    /// Best rated first.
    Rating,
}

impl SortOrder {
    /// Every sort order, in dropdown order.
    pub const ALL: [SortOrder; 6] = [
        SortOrder::Relevance,
        SortOrder::PriceAscending,
        SortOrder::PriceDescending,
        SortOrder::Newest,
        SortOrder::Popularity,
        SortOrder::Rating,
    ];

    /// Slug used in catalogue links (`?sort=...`).
    pub fn slug(self) -> &'static str {
        match self {
            SortOrder::Relevance => "pertinence",
            SortOrder::PriceAscending => "prix-asc",
            SortOrder::PriceDescending => "prix-desc",
            SortOrder::Newest => "nouveautes",
            SortOrder::Popularity => "popularite",
            SortOrder::Rating => "note",
        }
    }

    /// Dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Relevance => "Pertinence",
            SortOrder::PriceAscending => "Prix : Croissant",
            SortOrder::PriceDescending => "Prix : Decroissant",
            SortOrder::Newest => "Nouveautes",
            SortOrder::Popularity => "Popularite",
            SortOrder::Rating => "Note moyenne",
        }
    }

    /// Look up a sort order by slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.slug() == slug)
    }

    /// Compare two products under this order.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::PriceAscending => a.price.to_minor_units().cmp(&b.price.to_minor_units()),
            SortOrder::PriceDescending => b.price.to_minor_units().cmp(&a.price.to_minor_units()),
            SortOrder::Newest => b.date_added.cmp(&a.date_added),
            SortOrder::Relevance | SortOrder::Popularity => b.popularity.cmp(&a.popularity),
            SortOrder::Rating => b.rating.cmp(&a.rating),
        }
    }

    /// Stable in-place sort.
    pub fn sort(self, products: &mut [&Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;

    use crate::products::tests::product;

    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|product| product.id.clone()).collect()
    }

    #[test]
    fn slugs_round_trip() {
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::from_slug(order.slug()), Some(order));
        }

        assert_eq!(SortOrder::from_slug("random"), None);
    }

    #[test]
    fn default_is_relevance() {
        assert_eq!(SortOrder::default(), SortOrder::Relevance);
    }

    #[test]
    fn price_orders_are_monotonic_and_stable() {
        let a = product("a", "X", 500);
        let b = product("b", "X", 100);
        let c = product("c", "X", 500);
        let mut products = vec![&a, &b, &c];

        SortOrder::PriceAscending.sort(&mut products);
        assert_eq!(ids(&products), vec!["b", "a", "c"]);

        let mut products = vec![&a, &b, &c];
        SortOrder::PriceDescending.sort(&mut products);
        assert_eq!(ids(&products), vec!["a", "c", "b"]);
    }

    #[test]
    fn newest_puts_latest_date_first() {
        let mut old = product("old", "X", 100);
        old.date_added = date(2024, 5, 1);
        let mut new = product("new", "X", 100);
        new.date_added = date(2025, 2, 14);
        let mut products = vec![&old, &new];

        SortOrder::Newest.sort(&mut products);

        assert_eq!(ids(&products), vec!["new", "old"]);
    }

    #[test]
    fn relevance_and_popularity_sort_by_popularity_descending() {
        let mut quiet = product("quiet", "X", 100);
        quiet.popularity = 10;
        let mut loud = product("loud", "X", 100);
        loud.popularity = 99;

        for order in [SortOrder::Relevance, SortOrder::Popularity] {
            let mut products = vec![&quiet, &loud];
            order.sort(&mut products);

            assert_eq!(ids(&products), vec!["loud", "quiet"]);
        }
    }

    #[test]
    fn rating_sorts_best_first() {
        let mut meh = product("meh", "X", 100);
        meh.rating = Decimal::new(31, 1);
        let mut great = product("great", "X", 100);
        great.rating = Decimal::new(49, 1);
        let mut products = vec![&meh, &great];

        SortOrder::Rating.sort(&mut products);

        assert_eq!(ids(&products), vec!["great", "meh"]);
    }
}
