//! Cart lines

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total, parse_localized_price},
    products::Product,
};

/// One row in the cart: a product reference and how many of it.
///
/// The quantity is never zero; dropping to zero removes the line instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    id: String,
    name: String,
    franchise: String,
    unit_price: Money<'static, Currency>,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Create a new cart line.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        franchise: impl Into<String>,
        unit_price: Money<'static, Currency>,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            franchise: franchise.into(),
            unit_price,
            quantity,
        }
    }

    /// Create a cart line priced from a localized string such as `"94,50"`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidPrice`] if the price cannot be read.
    pub fn with_localized_price(
        id: impl Into<String>,
        name: impl Into<String>,
        franchise: impl Into<String>,
        price: &str,
        quantity: NonZeroU32,
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let unit_price = parse_localized_price(price, currency)?;

        Ok(Self::new(id, name, franchise, unit_price, quantity))
    }

    /// A single unit of a catalog product.
    pub fn from_product(product: &Product) -> Self {
        Self::new(
            product.id.clone(),
            product.name.clone(),
            product.franchise.clone(),
            product.price,
            NonZeroU32::MIN,
        )
    }

    /// Product id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product franchise
    pub fn franchise(&self) -> &str {
        &self.franchise
    }

    /// Price of one unit
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// Number of units
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(&self.unit_price, self.quantity.get())
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Add `extra` units, returning the new quantity, or `None` on overflow.
    pub(crate) fn increase(&mut self, extra: u32) -> Option<NonZeroU32> {
        self.quantity = self.quantity.checked_add(extra)?;

        Some(self.quantity)
    }
}
