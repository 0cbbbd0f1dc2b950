//! Products

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Stock status shown on product cards and used as a filter facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Availability {
    /// Ships immediately.
    InStock,

    /// Few units left.
    LimitedStock,

    /// Not released yet.
    Preorder,
}

impl Availability {
    /// Every availability, in display order.
    pub const ALL: [Availability; 3] = [
        Availability::InStock,
        Availability::LimitedStock,
        Availability::Preorder,
    ];

    /// Facet label, as used in filters and catalogue links.
    pub fn label(self) -> &'static str {
        match self {
            Availability::InStock => "En Stock",
            Availability::LimitedStock => "Stock Limite",
            Availability::Preorder => "Precommande",
        }
    }

    /// Short uppercase badge text for product cards.
    pub fn badge(self) -> &'static str {
        match self {
            Availability::InStock => "EN STOCK",
            Availability::LimitedStock => "STOCK FAIBLE",
            Availability::Preorder => "PRECOMMANDE",
        }
    }

    /// Look up an availability by its facet label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|availability| availability.label() == label)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique product id, used in links and cart lines
    pub id: String,

    /// Product name
    pub name: String,

    /// Franchise (series) the product belongs to
    pub franchise: String,

    /// Catalog category
    pub category: String,

    /// Product type (e.g. "Booster Box", "Nendoroid")
    pub product_type: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Stock status
    pub availability: Availability,

    /// Average rating between 0 and 5
    pub rating: Decimal,

    /// Number of reviews behind the rating
    pub review_count: u32,

    /// Manufacturer or publisher
    pub manufacturer: String,

    /// Figure scale, e.g. "1/7"
    pub scale: Option<String>,

    /// Card rarity
    pub rarity: Option<String>,

    /// Featured character
    pub character: Option<String>,

    /// Date the product was added to the catalog
    pub date_added: Date,

    /// Popularity rank; higher is more popular
    pub popularity: u32,
}

/// Placeholder character used for products without a featured character.
const UNSPECIFIED_CHARACTER: &str = "Divers";

impl Product {
    /// Labelled specification rows for the product detail page.
    ///
    /// Optional attributes are skipped when absent.
    pub fn specs(&self) -> SmallVec<[(&'static str, String); 9]> {
        let mut specs = SmallVec::new();

        if !self.manufacturer.is_empty() {
            specs.push(("Fabricant", self.manufacturer.clone()));
        }

        specs.push(("Franchise", self.franchise.clone()));

        if let Some(character) = self
            .character
            .as_ref()
            .filter(|character| character.as_str() != UNSPECIFIED_CHARACTER)
        {
            specs.push(("Personnage", character.clone()));
        }

        if let Some(scale) = &self.scale {
            specs.push(("Échelle", scale.clone()));
        }

        specs.push(("Type", self.product_type.clone()));

        if let Some(rarity) = &self.rarity {
            specs.push(("Rareté", rarity.clone()));
        }

        specs.push(("Catégorie", self.category.clone()));
        specs.push(("Disponibilité", self.availability.label().to_string()));
        specs.push(("Date d'ajout", self.date_added.strftime("%m/%Y").to_string()));

        specs
    }
}
