//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::{OrderId, OrderTotals, ShippingMethod},
    pricing::{PricingError, format_amount},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Label shown instead of a zero shipping fee.
const FREE_SHIPPING_LABEL: &str = "GRATUITE";

/// Confirmation of a placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    order_id: OrderId,
    lines: Vec<CartLine>,
    totals: OrderTotals,
    shipping_method: ShippingMethod,
}

impl Receipt {
    /// Create a new receipt with the given details.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        lines: Vec<CartLine>,
        totals: OrderTotals,
        shipping_method: ShippingMethod,
    ) -> Self {
        Self {
            order_id,
            lines,
            totals,
            shipping_method,
        }
    }

    /// Order reference
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Ordered lines
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Subtotal, shipping and total
    pub fn totals(&self) -> OrderTotals {
        self.totals
    }

    /// Carrier chosen at the shipping step
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Writes the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total overflows or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Article", "Franchise", "Prix", "Qte", "Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name().to_string(),
                line.franchise().to_string(),
                euros(&line.unit_price()),
                line.quantity().to_string(),
                euros(&line.line_total()?),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\nCommande {}", self.order_id).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let shipping = if self.totals.has_free_shipping() {
            FREE_SHIPPING_LABEL.to_string()
        } else {
            euros(&self.totals.shipping)
        };

        let rows = [
            ("Sous-total:", euros(&self.totals.subtotal)),
            (
                "Livraison:",
                format!("{shipping} ({})", self.shipping_method.name()),
            ),
            ("Total:", euros(&self.totals.total)),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn euros(money: &Money<'_, Currency>) -> String {
    format!("{} €", format_amount(money))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rand::{SeedableRng, rngs::StdRng};
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    fn receipt(minor: i64, quantity: u32) -> TestResult<Receipt> {
        let quantity = NonZeroU32::new(quantity).ok_or("quantity must be non-zero")?;
        let lines = vec![CartLine::new(
            "p3",
            "Nendoroid Tanjiro Kamado",
            "Demon Slayer",
            Money::from_minor(minor, EUR),
            quantity,
        )];
        let totals = OrderTotals::for_lines(&lines, ShippingMethod::Colissimo, EUR)?;

        Ok(Receipt::new(
            OrderId::generate(&mut StdRng::seed_from_u64(9)),
            lines,
            totals,
            ShippingMethod::Colissimo,
        ))
    }

    #[test]
    fn write_to_lists_lines_and_totals() -> TestResult {
        let receipt = receipt(5499, 2)?;
        let mut out = Vec::new();

        receipt.write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains(receipt.order_id().as_str()));
        assert!(text.contains("Nendoroid Tanjiro Kamado"));
        assert!(text.contains("109,98 €"));
        assert!(text.contains("GRATUITE (Colissimo)"));

        Ok(())
    }

    #[test]
    fn write_to_shows_paid_shipping() -> TestResult {
        let receipt = receipt(1299, 1)?;
        let mut out = Vec::new();

        receipt.write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("6,99 € (Colissimo)"));
        assert!(text.contains("19,98 €"));

        Ok(())
    }
}
