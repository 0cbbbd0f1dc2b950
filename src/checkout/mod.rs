//! Checkout
//!
//! A four-step flow over its own copy of the cart: summary, shipping, payment,
//! confirmation. Edits made at the summary step never reach the cart store.

use std::{fmt, num::NonZeroU32};

use rand::Rng;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    pricing::{PricingError, total_price},
    receipt::Receipt,
};

pub mod order;
pub mod payment;
pub mod shipping;

pub use order::OrderId;
pub use payment::{CardDetails, PaymentMethod};
pub use shipping::{
    FREE_SHIPPING_THRESHOLD, ShippingAddress, ShippingDetails, ShippingMethod,
};

/// Errors raised by checkout transitions and edits.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Continuing from the summary requires at least one line.
    #[error("cannot continue with an empty cart")]
    EmptyCart,

    /// Lines can only be edited at the summary step.
    #[error("lines cannot be edited at the {0} step")]
    LinesLocked(CheckoutStep),

    /// Line edit was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Position in the checkout flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    /// Review lines and totals.
    #[default]
    Summary,

    /// Address and carrier.
    Shipping,

    /// Payment option.
    Payment,

    /// Order placed.
    Confirmation,
}

impl CheckoutStep {
    /// Every step, in flow order.
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Summary,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    /// Zero-based position.
    pub fn index(self) -> u8 {
        match self {
            CheckoutStep::Summary => 0,
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }

    /// Progress bar label.
    pub fn label(self) -> &'static str {
        match self {
            CheckoutStep::Summary => "RECAPITULATIF",
            CheckoutStep::Shipping => "LIVRAISON",
            CheckoutStep::Payment => "PAIEMENT",
            CheckoutStep::Confirmation => "CONFIRMATION",
        }
    }

    /// Step heading.
    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::Summary => "Recapitulatif de commande",
            CheckoutStep::Shipping => "Adresse de livraison",
            CheckoutStep::Payment => "Mode de paiement",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// The following step, clamped at confirmation.
    pub fn next(self) -> Self {
        match self {
            CheckoutStep::Summary => CheckoutStep::Shipping,
            CheckoutStep::Shipping => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::Confirmation => CheckoutStep::Confirmation,
        }
    }

    /// The preceding step, clamped at summary.
    pub fn previous(self) -> Self {
        match self {
            CheckoutStep::Summary | CheckoutStep::Shipping => CheckoutStep::Summary,
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Confirmation => CheckoutStep::Payment,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Subtotal, shipping fee and total of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: Money<'static, Currency>,

    /// Shipping fee; zero from the free-shipping threshold up
    pub shipping: Money<'static, Currency>,

    /// Subtotal plus shipping
    pub total: Money<'static, Currency>,
}

impl OrderTotals {
    /// Totals for a set of lines shipped with the given method.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a sum overflows or currencies differ.
    pub fn for_lines(
        lines: &[CartLine],
        method: ShippingMethod,
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let subtotal = total_price(lines, currency)?;
        let shipping = method.fee_for(&subtotal);
        let total = subtotal.add(shipping)?;

        Ok(Self {
            subtotal,
            shipping,
            total,
        })
    }

    /// Whether shipping is free.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }
}

/// Checkout
#[derive(Debug, Clone)]
pub struct Checkout {
    step: CheckoutStep,
    lines: Vec<CartLine>,
    currency: &'static Currency,
    shipping: ShippingDetails,
    payment: PaymentMethod,
    receipt: Option<Receipt>,
}

impl Checkout {
    /// Start a checkout at the summary step over the given lines.
    #[must_use]
    pub fn new(lines: Vec<CartLine>, currency: &'static Currency) -> Self {
        Self {
            step: CheckoutStep::Summary,
            lines,
            currency,
            shipping: ShippingDetails::default(),
            payment: PaymentMethod::default(),
            receipt: None,
        }
    }

    /// Start a checkout from a snapshot of the cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self::new(cart.snapshot(), cart.currency())
    }

    /// Current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Working lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Currency of the order.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Whether the "Continue" action is available.
    pub fn can_continue(&self) -> bool {
        match self.step {
            CheckoutStep::Summary => !self.lines.is_empty(),
            CheckoutStep::Shipping | CheckoutStep::Payment => true,
            CheckoutStep::Confirmation => false,
        }
    }

    /// Advance one step, drawing the order id from the thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`Checkout::advance_with_rng`].
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.advance_with_rng(&mut rand::thread_rng())
    }

    /// Advance one step. Reaching confirmation places the order: an id is drawn and
    /// the receipt is fixed. At confirmation this does nothing.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: continuing from the summary with no lines.
    /// - [`CheckoutError::Pricing`]: the order totals could not be calculated.
    pub fn advance_with_rng(&mut self, rng: &mut impl Rng) -> Result<CheckoutStep, CheckoutError> {
        if self.step == CheckoutStep::Summary && self.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let next = self.step.next();

        if next == self.step {
            return Ok(self.step);
        }

        if next == CheckoutStep::Confirmation {
            let totals = self.totals()?;
            let order_id = OrderId::generate(rng);

            tracing::info!(
                %order_id,
                lines = self.lines.len(),
                total = totals.total.to_minor_units(),
                method = self.shipping.method.name(),
                payment = self.payment.name(),
                "order confirmed"
            );

            self.receipt = Some(Receipt::new(
                order_id,
                self.lines.clone(),
                totals,
                self.shipping.method,
            ));
        }

        tracing::info!(from = %self.step, to = %next, "checkout advanced");

        self.step = next;

        Ok(next)
    }

    /// Go back one step. There is no way back from confirmation.
    pub fn back(&mut self) -> CheckoutStep {
        if self.step != CheckoutStep::Confirmation {
            let previous = self.step.previous();

            if previous != self.step {
                tracing::info!(from = %self.step, to = %previous, "checkout went back");
            }

            self.step = previous;
        }

        self.step
    }

    /// Change a line's quantity by `delta`; a line reaching zero is removed.
    ///
    /// Returns whether a line with that id was found.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::LinesLocked`]: not at the summary step.
    /// - [`CheckoutError::Cart`]: the new quantity does not fit in a line.
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> Result<bool, CheckoutError> {
        self.ensure_editable()?;

        let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) else {
            return Ok(false);
        };

        let quantity = i64::from(line.quantity().get()).saturating_add(delta);

        if quantity <= 0 {
            self.lines.retain(|line| line.id() != id);

            return Ok(true);
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| CartError::QuantityTooLarge(id.to_string(), quantity))?;

        line.set_quantity(quantity);

        Ok(true)
    }

    /// Remove a working line. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::LinesLocked`] when not at the summary step.
    pub fn remove_line(&mut self, id: &str) -> Result<bool, CheckoutError> {
        self.ensure_editable()?;

        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        Ok(self.lines.len() != before)
    }

    /// Shipping form.
    pub fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// Fill in the delivery address.
    pub fn set_address(&mut self, address: ShippingAddress) {
        self.shipping.address = address;
    }

    /// Pick a carrier.
    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        self.shipping.method = method;
    }

    /// Payment form.
    pub fn payment(&self) -> &PaymentMethod {
        &self.payment
    }

    /// Pick a payment option.
    pub fn set_payment(&mut self, payment: PaymentMethod) {
        self.payment = payment;
    }

    /// Totals of the working lines with the selected carrier.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Pricing`] if a sum overflows.
    pub fn totals(&self) -> Result<OrderTotals, CheckoutError> {
        Ok(OrderTotals::for_lines(
            &self.lines,
            self.shipping.method,
            self.currency,
        )?)
    }

    /// Receipt of the placed order, once confirmed.
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Id of the placed order, once confirmed.
    pub fn order_id(&self) -> Option<&OrderId> {
        self.receipt.as_ref().map(Receipt::order_id)
    }

    fn ensure_editable(&self) -> Result<(), CheckoutError> {
        if self.step == CheckoutStep::Summary {
            Ok(())
        } else {
            Err(CheckoutError::LinesLocked(self.step))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    fn line(id: &str, minor: i64, quantity: u32) -> TestResult<CartLine> {
        let quantity = NonZeroU32::new(quantity).ok_or("quantity must be non-zero")?;

        Ok(CartLine::new(id, id, "Test", Money::from_minor(minor, EUR), quantity))
    }

    fn checkout() -> TestResult<Checkout> {
        Ok(Checkout::new(
            vec![
                line("gojo", 8999, 1)?,
                line("op09", 9450, 2)?,
                line("tanjiro", 5499, 1)?,
            ],
            EUR,
        ))
    }

    #[test]
    fn steps_are_clamped() {
        assert_eq!(CheckoutStep::Summary.previous(), CheckoutStep::Summary);
        assert_eq!(CheckoutStep::Confirmation.next(), CheckoutStep::Confirmation);

        for (index, step) in CheckoutStep::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(step.index()), index);
        }
    }

    #[test]
    fn free_shipping_scenario() -> TestResult {
        let checkout = checkout()?;

        let totals = checkout.totals()?;

        assert_eq!(totals.subtotal, Money::from_minor(33398, EUR));
        assert_eq!(totals.shipping, Money::from_minor(0, EUR));
        assert_eq!(totals.total, Money::from_minor(33398, EUR));
        assert!(totals.has_free_shipping());

        Ok(())
    }

    #[test]
    fn shipping_below_threshold_follows_method() -> TestResult {
        let mut checkout = Checkout::new(vec![line("booster", 599, 1)?], EUR);

        assert_eq!(checkout.totals()?.shipping, Money::from_minor(699, EUR));
        assert_eq!(checkout.totals()?.total, Money::from_minor(1298, EUR));

        checkout.set_shipping_method(ShippingMethod::MondialRelay);

        assert_eq!(checkout.totals()?.shipping, Money::from_minor(499, EUR));

        Ok(())
    }

    #[test]
    fn empty_summary_cannot_continue() -> TestResult {
        let mut checkout = Checkout::new(Vec::new(), EUR);

        assert!(!checkout.can_continue());
        assert_eq!(checkout.advance(), Err(CheckoutError::EmptyCart));
        assert_eq!(checkout.step(), CheckoutStep::Summary);

        Ok(())
    }

    #[test]
    fn removing_every_line_disables_continue() -> TestResult {
        let mut checkout = Checkout::new(vec![line("a", 100, 1)?], EUR);

        assert!(checkout.can_continue());
        assert!(checkout.remove_line("a")?);
        assert!(!checkout.can_continue());

        Ok(())
    }

    #[test]
    fn full_flow_reaches_confirmation() -> TestResult {
        let mut checkout = checkout()?;
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(checkout.advance_with_rng(&mut rng)?, CheckoutStep::Shipping);
        assert_eq!(checkout.advance_with_rng(&mut rng)?, CheckoutStep::Payment);
        assert!(checkout.order_id().is_none());
        assert_eq!(checkout.advance_with_rng(&mut rng)?, CheckoutStep::Confirmation);

        let order_id = checkout.order_id().cloned().ok_or("order id missing")?;

        assert!(order_id.as_str().starts_with("ASF-"));
        assert!(!checkout.can_continue());

        assert_eq!(checkout.advance_with_rng(&mut rng)?, CheckoutStep::Confirmation);
        assert_eq!(checkout.order_id(), Some(&order_id));

        Ok(())
    }

    #[test]
    fn back_is_clamped_and_locked_after_confirmation() -> TestResult {
        let mut checkout = checkout()?;
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(checkout.back(), CheckoutStep::Summary);

        checkout.advance_with_rng(&mut rng)?;
        checkout.advance_with_rng(&mut rng)?;

        assert_eq!(checkout.back(), CheckoutStep::Shipping);

        checkout.advance_with_rng(&mut rng)?;
        checkout.advance_with_rng(&mut rng)?;

        assert_eq!(checkout.back(), CheckoutStep::Confirmation);

        Ok(())
    }

    #[test]
    fn adjust_quantity_applies_delta_and_removes_at_zero() -> TestResult {
        let mut checkout = checkout()?;

        assert!(checkout.adjust_quantity("op09", 1)?);
        assert_eq!(
            checkout
                .lines()
                .iter()
                .find(|line| line.id() == "op09")
                .map(|line| line.quantity().get()),
            Some(3)
        );

        assert!(checkout.adjust_quantity("gojo", -1)?);
        assert!(checkout.lines().iter().all(|line| line.id() != "gojo"));
        assert!(!checkout.adjust_quantity("missing", 1)?);

        Ok(())
    }

    #[test]
    fn lines_are_locked_after_summary() -> TestResult {
        let mut checkout = checkout()?;

        checkout.advance()?;

        assert_eq!(
            checkout.remove_line("gojo"),
            Err(CheckoutError::LinesLocked(CheckoutStep::Shipping))
        );
        assert_eq!(
            checkout.adjust_quantity("gojo", 1),
            Err(CheckoutError::LinesLocked(CheckoutStep::Shipping))
        );

        Ok(())
    }

    #[test]
    fn edits_do_not_reach_the_cart() -> TestResult {
        let cart = Cart::with_lines([line("a", 100, 2)?], EUR)?;
        let mut checkout = Checkout::from_cart(&cart);

        checkout.adjust_quantity("a", -2)?;

        assert!(checkout.lines().is_empty());
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn receipt_uses_selected_method() -> TestResult {
        let mut checkout = Checkout::new(vec![line("booster", 599, 2)?], EUR);
        let mut rng = StdRng::seed_from_u64(3);

        checkout.advance_with_rng(&mut rng)?;
        checkout.set_shipping_method(ShippingMethod::ColissimoExpress);
        checkout.advance_with_rng(&mut rng)?;
        checkout.set_payment(PaymentMethod::PayPal);
        checkout.advance_with_rng(&mut rng)?;

        let receipt = checkout.receipt().ok_or("receipt missing")?;

        assert_eq!(receipt.shipping_method(), ShippingMethod::ColissimoExpress);
        assert_eq!(receipt.totals().shipping, Money::from_minor(1299, EUR));
        assert_eq!(receipt.totals().total, Money::from_minor(2497, EUR));

        Ok(())
    }
}
