//! Cart
//!
//! Session-lifetime cart store. Every mutation goes through `&mut self`, and registered
//! listeners are told about it afterwards with a [`CartEvent`].

use std::{fmt, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    pricing::{PricingError, format_amount, total_price},
    products::Product,
};

mod line;

pub use line::CartLine;

new_key_type! {
    /// Listener Key
    pub struct ListenerKey;
}

/// Callback notified after each cart mutation.
pub type CartListener = Box<dyn FnMut(&CartEvent)>;

/// Errors related to cart mutations or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (product id, line currency, cart currency).
    #[error("line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A quantity does not fit in a cart line.
    #[error("quantity {1} is too large for line {0}")]
    QuantityTooLarge(String, i64),

    /// Line or cart total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added; `quantity` is the line's new quantity.
    ItemAdded {
        /// Product id
        id: String,

        /// Quantity after the addition
        quantity: NonZeroU32,
    },

    /// A line was removed.
    ItemRemoved {
        /// Product id
        id: String,
    },

    /// A line's quantity was set.
    QuantityUpdated {
        /// Product id
        id: String,

        /// New quantity
        quantity: NonZeroU32,
    },

    /// Every line was removed.
    Cleared,

    /// The cart panel was opened or closed.
    VisibilityChanged {
        /// Whether the panel is now open
        open: bool,
    },
}

/// Cart
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
    open: bool,
    listeners: SlotMap<ListenerKey, CartListener>,
}

impl Cart {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            open: false,
            listeners: SlotMap::with_key(),
        }
    }

    /// Create a cart seeded with lines. Lines sharing an id are merged.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] on a currency mismatch or a merged quantity overflow.
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Self::new(currency);

        for line in lines {
            cart.check_currency(line.id(), line.unit_price())?;

            match cart.lines.iter_mut().find(|existing| existing.id() == line.id()) {
                Some(existing) => {
                    existing.increase(line.quantity().get()).ok_or_else(|| {
                        CartError::QuantityTooLarge(
                            line.id().to_string(),
                            i64::from(line.quantity().get()),
                        )
                    })?;
                }
                None => cart.lines.push(line),
            }
        }

        Ok(cart)
    }

    /// Add one unit of a product and open the cart panel.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is priced in another currency, or its line
    /// is already at the maximum quantity.
    pub fn add_item(&mut self, product: &Product) -> Result<NonZeroU32, CartError> {
        self.check_currency(&product.id, product.price)?;

        let quantity = match self.lines.iter_mut().find(|line| line.id() == product.id) {
            Some(line) => line.increase(1).ok_or_else(|| {
                CartError::QuantityTooLarge(product.id.clone(), i64::from(u32::MAX) + 1)
            })?,
            None => {
                let line = CartLine::from_product(product);
                let quantity = line.quantity();

                self.lines.push(line);

                quantity
            }
        };

        tracing::debug!(id = %product.id, quantity = quantity.get(), "added item to cart");

        self.emit(&CartEvent::ItemAdded {
            id: product.id.clone(),
            quantity,
        });

        self.set_open(true);

        Ok(quantity)
    }

    /// Remove a line. Removing an absent id does nothing.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        if self.lines.len() == before {
            return false;
        }

        tracing::debug!(id, "removed item from cart");

        self.emit(&CartEvent::ItemRemoved { id: id.to_string() });

        true
    }

    /// Set a line's quantity. Zero or less removes the line; an unknown id does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityTooLarge`] if the quantity does not fit in a line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(id);

            return Ok(());
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| CartError::QuantityTooLarge(id.to_string(), quantity))?;

        let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) else {
            return Ok(());
        };

        line.set_quantity(quantity);

        tracing::debug!(id, quantity = quantity.get(), "updated cart quantity");

        self.emit(&CartEvent::QuantityUpdated {
            id: id.to_string(),
            quantity,
        });

        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();

        tracing::debug!("cleared cart");

        self.emit(&CartEvent::Cleared);
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Sum of unit price times quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, CartError> {
        Ok(total_price(&self.lines, self.currency)?)
    }

    /// The cart total as displayed, e.g. `"333,98"`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total overflows.
    pub fn formatted_total_price(&self) -> Result<String, CartError> {
        Ok(format_amount(&self.total_price()?))
    }

    /// Open or close the cart panel. Listeners only hear about actual changes.
    pub fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }

        self.open = open;

        self.emit(&CartEvent::VisibilityChanged { open });
    }

    /// Whether the cart panel is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Register a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartEvent) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    /// Drop a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Copy of the current lines, used to seed a checkout.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get a line by product id.
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of every line in the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_currency(&self, id: &str, price: Money<'static, Currency>) -> Result<(), CartError> {
        let line_currency = price.currency();

        if line_currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                id.to_string(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }

    fn emit(&mut self, event: &CartEvent) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("currency", &self.currency.iso_alpha_code)
            .field("open", &self.open)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
