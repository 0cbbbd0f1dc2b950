//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines, in cart order
    pub lines: Vec<CartLineFixture>,
}

/// Cart Line Fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Id of a product in the loaded catalog
    pub product: String,

    /// Number of units; must be at least 1
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
