//! Payment

use std::fmt;

/// Card form fields. Nothing is validated or submitted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    /// Name on the card
    pub holder: String,

    /// Card number as typed
    pub number: String,

    /// Expiry, `MM / AA`
    pub expiry: String,

    /// Security code
    pub cvc: String,
}

impl CardDetails {
    /// Last four digits of the card number, for display.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().saturating_sub(4);

        digits.iter().skip(start).collect()
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder", &self.holder)
            .field("number", &format_args!("**** {}", self.last_four()))
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Payment option chosen at the payment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Pay by card.
    Card(CardDetails),

    /// Redirect to PayPal.
    PayPal,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card(CardDetails::default())
    }
}

impl PaymentMethod {
    /// Option name.
    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Card(_) => "Carte Bancaire",
            PaymentMethod::PayPal => "PayPal",
        }
    }

    /// Short description shown under the name.
    pub fn description(&self) -> &'static str {
        match self {
            PaymentMethod::Card(_) => "Visa, Mastercard, Cartes Bancaires",
            PaymentMethod::PayPal => "Payez avec votre compte PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails {
            holder: "YUJI ITADORI".to_string(),
            number: "4970 1012 3456 7890".to_string(),
            expiry: "12 / 28".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn last_four_ignores_spacing() {
        assert_eq!(card().last_four(), "7890");
        assert_eq!(CardDetails::default().last_four(), "");
    }

    #[test]
    fn debug_redacts_number_and_cvc() {
        let debug = format!("{:?}", card());

        assert!(debug.contains("**** 7890"));
        assert!(!debug.contains("4970"));
        assert!(!debug.contains("123\""));
    }

    #[test]
    fn default_payment_is_card() {
        assert_eq!(PaymentMethod::default().name(), "Carte Bancaire");
        assert_eq!(PaymentMethod::PayPal.to_string(), "PayPal");
    }
}
