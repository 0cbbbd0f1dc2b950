//! Order ids

use std::fmt;

use rand::Rng;

/// Prefix of every order id.
pub const ORDER_ID_PREFIX: &str = "ASF-";

const ORDER_ID_SUFFIX_LEN: usize = 6;

/// Synthetic order reference shown on the confirmation, e.g. `ASF-K3X9QZ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Draw a new id: the prefix followed by six uppercase base-36 characters.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let suffix: String = (0..ORDER_ID_SUFFIX_LEN)
            .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        Self(format!("{ORDER_ID_PREFIX}{suffix}"))
    }

    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
