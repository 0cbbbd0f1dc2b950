//! Catalogue link parameters
//!
//! `/catalogue?franchise=...&category=...&availability=...&sort=...` seeds the listing.
//! Each parameter is checked against the values the catalog knows about; anything
//! unrecognised is ignored and leaves the default in place.

use url::form_urlencoded;

use crate::catalog::{Catalog, Facet, FilterState, SortOrder};

/// Path of the catalogue listing page.
pub const CATALOGUE_PATH: &str = "/catalogue";

const FRANCHISE_PARAM: &str = "franchise";
const CATEGORY_PARAM: &str = "category";
const AVAILABILITY_PARAM: &str = "availability";
const SORT_PARAM: &str = "sort";

/// Initial listing state decoded from a catalogue link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Filters to start from
    pub filters: FilterState,

    /// Sort order to start from
    pub sort: SortOrder,
}

impl ListingQuery {
    /// Decode a query string, with or without its leading `?`.
    ///
    /// Only the first occurrence of each parameter is considered.
    pub fn parse(query: &str, catalog: &Catalog) -> Self {
        let pairs: Vec<(String, String)> =
            form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect();

        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
                .filter(|value| !value.is_empty())
        };

        let mut listing = Self::default();

        for (param, facet) in [
            (FRANCHISE_PARAM, Facet::Franchise),
            (CATEGORY_PARAM, Facet::Category),
            (AVAILABILITY_PARAM, Facet::Availability),
        ] {
            match first(param) {
                Some(value) if catalog.has_facet_value(facet, value) => {
                    listing.filters.select_only(facet, value);
                }
                Some(value) => {
                    tracing::debug!(param, value, "ignoring unknown catalogue parameter value");
                }
                None => {}
            }
        }

        if let Some(slug) = first(SORT_PARAM) {
            match SortOrder::from_slug(slug) {
                Some(sort) => listing.sort = sort,
                None => tracing::debug!(slug, "ignoring unknown sort order"),
            }
        }

        listing
    }
}

/// Link parameters for a catalogue URL; unset parameters are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogueLink<'a> {
    /// Franchise to preselect
    pub franchise: Option<&'a str>,

    /// Category to preselect
    pub category: Option<&'a str>,

    /// Availability label to preselect
    pub availability: Option<&'a str>,

    /// Sort order to start from
    pub sort: Option<SortOrder>,
}

impl CatalogueLink<'_> {
    /// Render the link, e.g. `/catalogue?category=Figurines&sort=nouveautes`.
    pub fn to_url(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (param, value) in [
            (FRANCHISE_PARAM, self.franchise),
            (CATEGORY_PARAM, self.category),
            (AVAILABILITY_PARAM, self.availability),
            (SORT_PARAM, self.sort.map(SortOrder::slug)),
        ] {
            if let Some(value) = value {
                serializer.append_pair(param, value);
            }
        }

        let query = serializer.finish();

        if query.is_empty() {
            CATALOGUE_PATH.to_string()
        } else {
            format!("{CATALOGUE_PATH}?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::products::{Availability, tests::product};

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        let mut figure = product("p1", "One Piece", 14999);
        figure.category = "Figurines".to_string();
        let mut booster = product("p2", "Pokemon", 599);
        booster.category = "Booster".to_string();

        Ok(Catalog::with_products([figure, booster], EUR)?)
    }

    #[test]
    fn parses_known_parameters() -> TestResult {
        let catalog = catalog()?;

        let listing = ListingQuery::parse(
            "?franchise=One%20Piece&category=Booster&availability=Precommande&sort=prix-desc",
            &catalog,
        );

        assert!(listing.filters.selection(Facet::Franchise).contains("One Piece"));
        assert!(listing.filters.selection(Facet::Category).contains("Booster"));
        assert!(
            listing
                .filters
                .selection(Facet::Availability)
                .contains(Availability::Preorder.label())
        );
        assert_eq!(listing.sort, SortOrder::PriceDescending);

        Ok(())
    }

    #[test]
    fn plus_decodes_to_space() -> TestResult {
        let catalog = catalog()?;

        let listing = ListingQuery::parse("franchise=One+Piece", &catalog);

        assert!(listing.filters.selection(Facet::Franchise).contains("One Piece"));

        Ok(())
    }

    #[test]
    fn unknown_values_are_ignored() -> TestResult {
        let catalog = catalog()?;

        let listing = ListingQuery::parse(
            "franchise=Bleach&category=Peluches&availability=Rupture&sort=aleatoire&page=2",
            &catalog,
        );

        assert_eq!(listing, ListingQuery::default());

        Ok(())
    }

    #[test]
    fn only_first_occurrence_counts() -> TestResult {
        let catalog = catalog()?;

        let listing = ListingQuery::parse("sort=bogus&sort=note", &catalog);

        assert_eq!(listing.sort, SortOrder::Relevance);

        Ok(())
    }

    #[test]
    fn empty_query_is_default() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ListingQuery::parse("", &catalog), ListingQuery::default());

        Ok(())
    }

    #[test]
    fn link_omits_unset_parameters() {
        let link = CatalogueLink {
            category: Some("Figurines"),
            sort: Some(SortOrder::Newest),
            ..CatalogueLink::default()
        };

        assert_eq!(link.to_url(), "/catalogue?category=Figurines&sort=nouveautes");
        assert_eq!(CatalogueLink::default().to_url(), "/catalogue");
    }

    #[test]
    fn link_round_trips_through_parse() -> TestResult {
        let catalog = catalog()?;
        let url = CatalogueLink {
            franchise: Some("One Piece"),
            availability: Some("En Stock"),
            ..CatalogueLink::default()
        }
        .to_url();

        let query = url
            .split_once('?')
            .map(|(_, query)| query)
            .ok_or("expected query string")?;
        let listing = ListingQuery::parse(query, &catalog);

        assert!(listing.filters.selection(Facet::Franchise).contains("One Piece"));
        assert!(listing.filters.selection(Facet::Availability).contains("En Stock"));

        Ok(())
    }
}
