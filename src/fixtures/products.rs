//! Catalog Fixtures

use jiff::civil::Date;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Availability, Product},
    search::{SearchCategory, SearchFranchise},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products, in catalog order
    pub products: Vec<ProductFixture>,

    /// Categories offered by search
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,

    /// Franchises offered by search
    #[serde(default)]
    pub franchises: Vec<FranchiseFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Unique product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Franchise
    pub franchise: String,

    /// Category
    pub category: String,

    /// Product type
    #[serde(rename = "type")]
    pub product_type: String,

    /// Product price (e.g., "89.99 EUR")
    pub price: String,

    /// Availability label (e.g., "En Stock")
    pub availability: String,

    /// Average rating (e.g., "4.8")
    pub rating: String,

    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,

    /// Manufacturer
    #[serde(default)]
    pub manufacturer: String,

    /// Figure scale
    pub scale: Option<String>,

    /// Card rarity
    pub rarity: Option<String>,

    /// Featured character
    pub character: Option<String>,

    /// Date added, `YYYY-MM-DD`
    pub date_added: String,

    /// Popularity rank
    #[serde(default)]
    pub popularity: u32,
}

/// Search category fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category id
    pub id: String,

    /// Display name
    pub name: String,

    /// Product count
    #[serde(default)]
    pub count: u32,
}

/// Search franchise fixture
#[derive(Debug, Deserialize)]
pub struct FranchiseFixture {
    /// Franchise id
    pub id: String,

    /// Display name
    pub name: String,

    /// Japanese title
    #[serde(default)]
    pub jp: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        let availability = Availability::from_label(&fixture.availability)
            .ok_or_else(|| FixtureError::UnknownAvailability(fixture.availability.clone()))?;

        let rating = fixture
            .rating
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|rating| (Decimal::ZERO..=Decimal::from(5)).contains(rating))
            .ok_or_else(|| FixtureError::InvalidRating(fixture.rating.clone()))?;

        let date_added = parse_date(&fixture.date_added)?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            franchise: fixture.franchise,
            category: fixture.category,
            product_type: fixture.product_type,
            price: Money::from_minor(minor_units, currency),
            availability,
            rating,
            review_count: fixture.reviews,
            manufacturer: fixture.manufacturer,
            scale: fixture.scale,
            rarity: fixture.rarity,
            character: fixture.character,
            date_added,
            popularity: fixture.popularity,
        })
    }
}

impl From<CategoryFixture> for SearchCategory {
    fn from(fixture: CategoryFixture) -> Self {
        SearchCategory {
            id: fixture.id,
            name: fixture.name,
            count: fixture.count,
        }
    }
}

impl From<FranchiseFixture> for SearchFranchise {
    fn from(fixture: FranchiseFixture) -> Self {
        SearchFranchise {
            id: fixture.id,
            name: fixture.name,
            jp: fixture.jp,
        }
    }
}

/// Parse price string (e.g., "89.99 EUR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .ok()
        .filter(|amount| !amount.is_sign_negative())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "EUR" => EUR,
        "GBP" => GBP,
        "USD" => USD,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidDate`] if the string is not a valid calendar date.
pub fn parse_date(s: &str) -> Result<Date, FixtureError> {
    s.trim()
        .parse::<Date>()
        .map_err(|_err| FixtureError::InvalidDate(s.to_string()))
}
