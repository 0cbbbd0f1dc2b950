//! Catalogue listing against the default fixture set.

use testresult::TestResult;

use storefront::{
    catalog::{Facet, FilterState, SortOrder},
    fixtures::Fixture,
    products::Product,
};

fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
    products.iter().map(|product| product.id.as_str()).collect()
}

#[test]
fn pokemon_listing_is_ordered_by_popularity() -> TestResult {
    let storefront = Fixture::from_set("default")?.into_storefront()?;

    let listing = storefront.listing("?franchise=Pokemon");

    assert_eq!(ids(&listing), vec!["p5", "p13", "p9"]);
    assert!(listing.iter().all(|product| product.franchise == "Pokemon"));

    Ok(())
}

#[test]
fn filtered_listing_is_a_matching_subset() -> TestResult {
    let catalog = Fixture::from_set("default")?.catalog()?;

    let mut filters = FilterState::default();
    filters.select(Facet::Category, "Figurines");
    filters.select(Facet::Availability, "En Stock");
    filters.select(Facet::Availability, "Stock Limite");
    filters.set_price_range(40, 150)?;

    let listing = catalog.listing(&filters, SortOrder::default());

    assert!(!listing.is_empty());

    for product in &listing {
        assert!(catalog.find(&product.id).is_some());
        assert_eq!(product.category, "Figurines");
        assert_ne!(product.availability.label(), "Precommande");

        let minor = product.price.to_minor_units();
        assert!((40_00..=150_00).contains(&minor), "{} out of range", product.id);
    }

    let excluded = catalog
        .iter()
        .filter(|product| listing.iter().all(|listed| listed.id != product.id));

    for product in excluded {
        assert!(!filters.matches(product), "{} should be listed", product.id);
    }

    Ok(())
}

#[test]
fn price_sorts_are_monotonic() -> TestResult {
    let catalog = Fixture::from_set("default")?.catalog()?;
    let filters = FilterState::default();

    let ascending: Vec<i64> = catalog
        .listing(&filters, SortOrder::PriceAscending)
        .iter()
        .map(|product| product.price.to_minor_units())
        .collect();

    let descending: Vec<i64> = catalog
        .listing(&filters, SortOrder::PriceDescending)
        .iter()
        .map(|product| product.price.to_minor_units())
        .collect();

    assert_eq!(ascending.len(), catalog.len());
    assert!(ascending.windows(2).all(|pair| pair.first() <= pair.last()));
    assert!(descending.windows(2).all(|pair| pair.first() >= pair.last()));

    Ok(())
}

#[test]
fn unknown_query_values_are_ignored() -> TestResult {
    let storefront = Fixture::from_set("default")?.into_storefront()?;

    let listing = storefront.listing("?franchise=Bleach&sort=alphabetique&page=2");

    assert_eq!(listing.len(), storefront.catalog.len());
    assert_eq!(listing.first().map(|product| product.id.as_str()), Some("p1"));

    Ok(())
}

#[test]
fn query_combines_facets_and_sort() -> TestResult {
    let storefront = Fixture::from_set("default")?.into_storefront()?;

    let listing = storefront.listing("category=Cartes&availability=En+Stock&sort=prix-asc");

    assert_eq!(ids(&listing), vec!["p15", "p5", "p7", "p11"]);

    Ok(())
}

#[test]
fn search_folds_accents() -> TestResult {
    let storefront = Fixture::from_set("default")?.into_storefront()?;

    let results = storefront.search("POKÉMON");

    assert_eq!(results.products.len(), 3);
    assert_eq!(
        results.franchises.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
        vec!["f8"]
    );

    let mut cursor = results.cursor();

    assert_eq!(cursor.move_up(), Some(results.len() - 1));
    assert_eq!(cursor.move_down(), Some(0));

    Ok(())
}
