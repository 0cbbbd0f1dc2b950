//! Listing filters
//!
//! Facets are ANDed with each other and ORed within themselves: a product must sit in
//! the price range and, for every facet with a selection, carry one of the selected
//! values. An empty selection leaves its facet unconstrained.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::products::Product;

/// Lowest selectable price, in whole currency units.
pub const PRICE_FLOOR: u32 = 0;

/// Highest selectable price, in whole currency units.
pub const PRICE_CEILING: u32 = 400;

/// Errors raised while editing filters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The range bounds are inverted or outside the selectable interval.
    #[error("invalid price range {min}-{max}; expected 0 <= min <= max <= 400")]
    InvalidPriceRange {
        /// Requested lower bound
        min: u32,
        /// Requested upper bound
        max: u32,
    },
}

/// Inclusive price range in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: u32,
    max: u32,
}

impl PriceRange {
    /// Create a range, validating `PRICE_FLOOR <= min <= max <= PRICE_CEILING`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPriceRange`] when the bounds are out of order or range.
    pub fn new(min: u32, max: u32) -> Result<Self, FilterError> {
        if min > max || max > PRICE_CEILING {
            return Err(FilterError::InvalidPriceRange { min, max });
        }

        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(self) -> u32 {
        self.min
    }

    /// Upper bound.
    pub fn max(self) -> u32 {
        self.max
    }

    /// Whether the range is narrower than the full selectable interval.
    pub fn is_narrowed(self) -> bool {
        self.min > PRICE_FLOOR || self.max < PRICE_CEILING
    }

    /// Whether a price in minor units falls inside the range.
    pub fn contains_minor(self, minor_units: i64) -> bool {
        let min = i64::from(self.min) * 100;
        let max = i64::from(self.max) * 100;

        (min..=max).contains(&minor_units)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: PRICE_FLOOR,
            max: PRICE_CEILING,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}€ - {}€", self.min, self.max)
    }
}

/// A filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Series the product belongs to.
    Franchise,

    /// Catalog category.
    Category,

    /// Product type.
    Type,

    /// Manufacturer or publisher.
    Manufacturer,

    /// Card rarity; products without one never match a rarity selection.
    Rarity,

    /// Figure scale; products without one never match a scale selection.
    Scale,

    /// Stock status label.
    Availability,
}

impl Facet {
    /// Every facet, in sidebar order.
    pub const ALL: [Facet; 7] = [
        Facet::Franchise,
        Facet::Category,
        Facet::Type,
        Facet::Manufacturer,
        Facet::Rarity,
        Facet::Scale,
        Facet::Availability,
    ];

    /// Key identifying the facet in tags and links.
    pub fn key(self) -> &'static str {
        match self {
            Facet::Franchise => "franchises",
            Facet::Category => "categories",
            Facet::Type => "types",
            Facet::Manufacturer => "manufacturers",
            Facet::Rarity => "rarities",
            Facet::Scale => "scales",
            Facet::Availability => "availabilities",
        }
    }

    /// The product's value for this facet, if it has one.
    pub fn value_of(self, product: &Product) -> Option<&str> {
        match self {
            Facet::Franchise => Some(&product.franchise),
            Facet::Category => Some(&product.category),
            Facet::Type => Some(&product.product_type),
            Facet::Manufacturer => Some(&product.manufacturer),
            Facet::Rarity => product.rarity.as_deref(),
            Facet::Scale => product.scale.as_deref(),
            Facet::Availability => Some(product.availability.label()),
        }
    }
}

/// Selected values of one facet, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    values: SmallVec<[String; 4]>,
}

impl FacetSelection {
    /// Whether the value is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|selected| selected == value)
    }

    /// Select a value; selecting twice has no further effect.
    pub fn insert(&mut self, value: &str) {
        if !self.contains(value) {
            self.values.push(value.to_string());
        }
    }

    /// Deselect a value. Returns whether it was selected.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();

        self.values.retain(|selected| selected != value);

        self.values.len() != before
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the selected values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Whether a product value satisfies this selection.
    fn admits(&self, value: Option<&str>) -> bool {
        self.is_empty() || value.is_some_and(|value| self.contains(value))
    }
}

/// What an active-filter tag removes when dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTagKind {
    /// The narrowed price range.
    PriceRange,

    /// One selected value of a facet.
    Facet(Facet),
}

/// A dismissible chip summarising one active constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTag {
    /// What the tag constrains
    pub kind: FilterTagKind,

    /// Selected value (`"price"` for the price range)
    pub value: String,

    /// Text displayed on the chip
    pub label: String,
}

/// The full filter sidebar state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    price_range: PriceRange,
    franchises: FacetSelection,
    categories: FacetSelection,
    types: FacetSelection,
    manufacturers: FacetSelection,
    rarities: FacetSelection,
    scales: FacetSelection,
    availabilities: FacetSelection,
}

impl FilterState {
    /// Current price range.
    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    /// Replace the price range.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPriceRange`] and leaves the range untouched when
    /// the bounds are invalid.
    pub fn set_price_range(&mut self, min: u32, max: u32) -> Result<(), FilterError> {
        self.price_range = PriceRange::new(min, max)?;

        Ok(())
    }

    /// The selection for a facet.
    pub fn selection(&self, facet: Facet) -> &FacetSelection {
        match facet {
            Facet::Franchise => &self.franchises,
            Facet::Category => &self.categories,
            Facet::Type => &self.types,
            Facet::Manufacturer => &self.manufacturers,
            Facet::Rarity => &self.rarities,
            Facet::Scale => &self.scales,
            Facet::Availability => &self.availabilities,
        }
    }

    fn selection_mut(&mut self, facet: Facet) -> &mut FacetSelection {
        match facet {
            Facet::Franchise => &mut self.franchises,
            Facet::Category => &mut self.categories,
            Facet::Type => &mut self.types,
            Facet::Manufacturer => &mut self.manufacturers,
            Facet::Rarity => &mut self.rarities,
            Facet::Scale => &mut self.scales,
            Facet::Availability => &mut self.availabilities,
        }
    }

    /// Select a facet value.
    pub fn select(&mut self, facet: Facet, value: &str) {
        self.selection_mut(facet).insert(value);
    }

    /// Replace a facet's selection with a single value.
    pub fn select_only(&mut self, facet: Facet, value: &str) {
        let selection = self.selection_mut(facet);

        *selection = FacetSelection::default();
        selection.insert(value);
    }

    /// Deselect a facet value. Returns whether it was selected.
    pub fn deselect(&mut self, facet: Facet, value: &str) -> bool {
        self.selection_mut(facet).remove(value)
    }

    /// Flip a facet value between selected and deselected.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        if !self.deselect(facet, value) {
            self.select(facet, value);
        }
    }

    /// Reset every constraint.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the product satisfies every active constraint.
    pub fn matches(&self, product: &Product) -> bool {
        self.price_range
            .contains_minor(product.price.to_minor_units())
            && Facet::ALL
                .into_iter()
                .all(|facet| self.selection(facet).admits(facet.value_of(product)))
    }

    /// Number of selected facet values, plus one for a narrowed price range.
    pub fn active_count(&self) -> usize {
        let selected: usize = Facet::ALL
            .into_iter()
            .map(|facet| self.selection(facet).len())
            .sum();

        selected + usize::from(self.price_range.is_narrowed())
    }

    /// Chips for the active constraints: the price range first, then facet values in
    /// sidebar and selection order.
    pub fn active_tags(&self) -> Vec<FilterTag> {
        let mut tags = Vec::with_capacity(self.active_count());

        if self.price_range.is_narrowed() {
            tags.push(FilterTag {
                kind: FilterTagKind::PriceRange,
                value: "price".to_string(),
                label: self.price_range.to_string(),
            });
        }

        for facet in Facet::ALL {
            for value in self.selection(facet).iter() {
                tags.push(FilterTag {
                    kind: FilterTagKind::Facet(facet),
                    value: value.to_string(),
                    label: value.to_string(),
                });
            }
        }

        tags
    }

    /// Dismiss a chip: the price tag resets the range, a facet tag drops its value.
    pub fn remove_tag(&mut self, tag: &FilterTag) {
        match tag.kind {
            FilterTagKind::PriceRange => self.price_range = PriceRange::default(),
            FilterTagKind::Facet(facet) => {
                self.deselect(facet, &tag.value);
            }
        }
    }
}
