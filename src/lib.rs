//! Storefront
//!
//! Catalog filtering, cart and checkout state for a manga and anime collectibles storefront.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod context;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod search;
