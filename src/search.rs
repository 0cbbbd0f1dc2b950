//! Search autocomplete
//!
//! Matching is a substring test on folded text: lowercased, NFD-decomposed and stripped
//! of combining diacritics, so `"pokémon"` finds `"Pokemon"`.

use unicode_normalization::UnicodeNormalization;

use crate::{catalog::Catalog, products::Product};

/// Maximum number of product suggestions.
pub const MAX_PRODUCTS: usize = 5;

/// Maximum number of category suggestions.
pub const MAX_CATEGORIES: usize = 3;

/// Maximum number of franchise suggestions.
pub const MAX_FRANCHISES: usize = 4;

/// A browsable category with its product count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCategory {
    /// Category id
    pub id: String,

    /// Display name
    pub name: String,

    /// Number of products shown next to the suggestion
    pub count: u32,
}

/// A franchise with its Japanese title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFranchise {
    /// Franchise id
    pub id: String,

    /// Display name
    pub name: String,

    /// Japanese title, also searchable
    pub jp: String,
}

/// Category and franchise lists searched alongside the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    categories: Vec<SearchCategory>,
    franchises: Vec<SearchFranchise>,
}

impl SearchIndex {
    /// Create an index over the given categories and franchises.
    pub fn new(categories: Vec<SearchCategory>, franchises: Vec<SearchFranchise>) -> Self {
        Self {
            categories,
            franchises,
        }
    }

    /// Indexed categories.
    pub fn categories(&self) -> &[SearchCategory] {
        &self.categories
    }

    /// Indexed franchises.
    pub fn franchises(&self) -> &[SearchFranchise] {
        &self.franchises
    }

    /// Suggestions for a query. A blank query yields no suggestions.
    pub fn search<'a>(&'a self, catalog: &'a Catalog, query: &str) -> SearchResults<'a> {
        let query = fold(query.trim());

        if query.is_empty() {
            return SearchResults::default();
        }

        let products = catalog
            .iter()
            .filter(|product| matches(&query, &product.name) || matches(&query, &product.franchise))
            .take(MAX_PRODUCTS)
            .collect();

        let categories = self
            .categories
            .iter()
            .filter(|category| matches(&query, &category.name))
            .take(MAX_CATEGORIES)
            .collect();

        let franchises = self
            .franchises
            .iter()
            .filter(|franchise| matches(&query, &franchise.name) || matches(&query, &franchise.jp))
            .take(MAX_FRANCHISES)
            .collect();

        let results = SearchResults {
            products,
            categories,
            franchises,
        };

        tracing::debug!(%query, results = results.len(), "search");

        results
    }
}

/// Grouped suggestions for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults<'a> {
    /// Matching products, in catalog order
    pub products: Vec<&'a Product>,

    /// Matching categories
    pub categories: Vec<&'a SearchCategory>,

    /// Matching franchises
    pub franchises: Vec<&'a SearchFranchise>,
}

/// One navigable suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEntry<'a> {
    /// Links to a product page
    Product(&'a str),

    /// Links to a category listing
    Category(&'a str),

    /// Links to a franchise listing
    Franchise(&'a str),
}

impl<'a> SearchResults<'a> {
    /// Total number of suggestions.
    pub fn len(&self) -> usize {
        self.products.len() + self.categories.len() + self.franchises.len()
    }

    /// Whether there are no suggestions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Suggestions flattened for keyboard navigation: products, then categories, then franchises.
    pub fn entries(&self) -> Vec<SearchEntry<'a>> {
        let products = self
            .products
            .iter()
            .map(|product| SearchEntry::Product(product.id.as_str()));

        let categories = self
            .categories
            .iter()
            .map(|category| SearchEntry::Category(category.id.as_str()));

        let franchises = self
            .franchises
            .iter()
            .map(|franchise| SearchEntry::Franchise(franchise.id.as_str()));

        products.chain(categories).chain(franchises).collect()
    }

    /// A cursor over the flattened suggestions.
    pub fn cursor(&self) -> SearchCursor {
        SearchCursor::new(self.len())
    }
}

/// Keyboard highlight over a list of suggestions. Movement wraps at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCursor {
    len: usize,
    active: Option<usize>,
}

impl SearchCursor {
    /// A cursor with nothing highlighted.
    pub fn new(len: usize) -> Self {
        Self { len, active: None }
    }

    /// Highlighted index, if any.
    pub fn active(self) -> Option<usize> {
        self.active
    }

    /// Move down; from the last entry, or from nothing, go to the first.
    pub fn move_down(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        self.active = Some(match self.active {
            Some(index) if index + 1 < self.len => index + 1,
            _ => 0,
        });

        self.active
    }

    /// Move up; from the first entry, or from nothing, go to the last.
    pub fn move_up(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        self.active = Some(match self.active {
            Some(index) if index > 0 => index - 1,
            _ => self.len - 1,
        });

        self.active
    }

    /// Clear the highlight, as when the query changes.
    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Lowercase, decompose and drop combining diacritical marks.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn matches(folded_query: &str, text: &str) -> bool {
    fold(text).contains(folded_query)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::products::tests::product;

    use super::*;

    fn index() -> SearchIndex {
        SearchIndex::new(
            vec![
                SearchCategory {
                    id: "c1".to_string(),
                    name: "Packs & Boosters".to_string(),
                    count: 342,
                },
                SearchCategory {
                    id: "c4".to_string(),
                    name: "Booster Boxes".to_string(),
                    count: 87,
                },
            ],
            vec![
                SearchFranchise {
                    id: "f8".to_string(),
                    name: "Pokemon".to_string(),
                    jp: "ポケモン".to_string(),
                },
                SearchFranchise {
                    id: "f4".to_string(),
                    name: "One Piece".to_string(),
                    jp: "ワンピース".to_string(),
                },
            ],
        )
    }

    fn catalog() -> TestResult<Catalog> {
        let products = (1..=7).map(|n| {
            let mut product = product(&format!("p{n}"), "Pokemon", 599);
            product.name = format!("Booster Pokemon {n}");
            product
        });

        Ok(Catalog::with_products(products, EUR)?)
    }

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Pokémon Écarlate"), "pokemon ecarlate");
    }

    #[test]
    fn blank_query_yields_nothing() -> TestResult {
        let catalog = catalog()?;
        let index = index();

        assert!(index.search(&catalog, "   ").is_empty());

        Ok(())
    }

    #[test]
    fn results_are_capped_per_group() -> TestResult {
        let catalog = catalog()?;
        let index = index();

        let results = index.search(&catalog, "BOOSTER");

        assert_eq!(results.products.len(), MAX_PRODUCTS);
        assert_eq!(results.categories.len(), 2);
        assert!(results.franchises.is_empty());

        Ok(())
    }

    #[test]
    fn accented_query_matches_plain_text() -> TestResult {
        let catalog = catalog()?;
        let index = index();

        let results = index.search(&catalog, "pokémon");

        assert_eq!(results.franchises.len(), 1);
        assert_eq!(results.products.len(), MAX_PRODUCTS);

        Ok(())
    }

    #[test]
    fn japanese_title_matches_franchise() -> TestResult {
        let catalog = catalog()?;
        let index = index();

        let results = index.search(&catalog, "ワンピース");

        assert_eq!(results.entries(), vec![SearchEntry::Franchise("f4")]);

        Ok(())
    }

    #[test]
    fn entries_flatten_products_then_categories_then_franchises() -> TestResult {
        let catalog = Catalog::with_products([product("p1", "One Piece", 12499)], EUR)?;
        let index = index();

        let results = index.search(&catalog, "o");
        let entries = results.entries();

        assert_eq!(entries.first(), Some(&SearchEntry::Product("p1")));
        assert_eq!(entries.last(), Some(&SearchEntry::Franchise("f4")));
        assert_eq!(entries.len(), results.len());

        Ok(())
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut cursor = SearchCursor::new(3);

        assert_eq!(cursor.active(), None);
        assert_eq!(cursor.move_down(), Some(0));
        assert_eq!(cursor.move_down(), Some(1));
        assert_eq!(cursor.move_down(), Some(2));
        assert_eq!(cursor.move_down(), Some(0));
        assert_eq!(cursor.move_up(), Some(2));

        cursor.reset();

        assert_eq!(cursor.move_up(), Some(2));
    }

    #[test]
    fn cursor_over_nothing_stays_empty() {
        let mut cursor = SearchCursor::new(0);

        assert_eq!(cursor.move_down(), None);
        assert_eq!(cursor.move_up(), None);
    }
}
