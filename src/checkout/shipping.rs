//! Shipping

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Subtotal, in minor units, from which shipping is free (80,00).
pub const FREE_SHIPPING_THRESHOLD: i64 = 80_00;

/// Destination country; only metropolitan France is served.
pub const SHIPPING_COUNTRY: &str = "France";

/// Carrier options offered at the shipping step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShippingMethod {
    /// Standard tracked parcel.
    #[default]
    Colissimo,

    /// Pickup point delivery.
    MondialRelay,

    /// Next-day parcel.
    ColissimoExpress,
}

impl ShippingMethod {
    /// Every method, in the order offered.
    pub const ALL: [ShippingMethod; 3] = [
        ShippingMethod::Colissimo,
        ShippingMethod::MondialRelay,
        ShippingMethod::ColissimoExpress,
    ];

    /// Carrier name.
    pub fn name(self) -> &'static str {
        match self {
            ShippingMethod::Colissimo => "Colissimo",
            ShippingMethod::MondialRelay => "Mondial Relay",
            ShippingMethod::ColissimoExpress => "Colissimo Express",
        }
    }

    /// Delivery delay shown next to the price.
    pub fn delay(self) -> &'static str {
        match self {
            ShippingMethod::Colissimo => "2-3 jours ouvrables",
            ShippingMethod::MondialRelay => "3-5 jours ouvrables",
            ShippingMethod::ColissimoExpress => "24h",
        }
    }

    /// Identifier used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            ShippingMethod::Colissimo => "colissimo",
            ShippingMethod::MondialRelay => "mondial-relay",
            ShippingMethod::ColissimoExpress => "colissimo-express",
        }
    }

    /// Look up a method by slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.slug() == slug)
    }

    /// Flat carrier price.
    pub fn price(self, currency: &'static Currency) -> Money<'static, Currency> {
        let minor_units = match self {
            ShippingMethod::Colissimo => 6_99,
            ShippingMethod::MondialRelay => 4_99,
            ShippingMethod::ColissimoExpress => 12_99,
        };

        Money::from_minor(minor_units, currency)
    }

    /// Fee charged for an order: nothing from [`FREE_SHIPPING_THRESHOLD`] up, the
    /// carrier price below it.
    pub fn fee_for(self, subtotal: &Money<'static, Currency>) -> Money<'static, Currency> {
        let currency = subtotal.currency();

        if subtotal.to_minor_units() >= FREE_SHIPPING_THRESHOLD {
            Money::from_minor(0, currency)
        } else {
            self.price(currency)
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Delivery address. Every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Street number and name
    pub address: String,

    /// Apartment, building, etc.
    pub complement: String,

    /// Postal code
    pub postal_code: String,

    /// City
    pub city: String,

    /// Phone number
    pub phone: String,
}

impl ShippingAddress {
    /// Destination country.
    pub fn country(&self) -> &'static str {
        SHIPPING_COUNTRY
    }
}

/// Everything collected at the shipping step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Where to deliver
    pub address: ShippingAddress,

    /// How to deliver
    pub method: ShippingMethod,
}
