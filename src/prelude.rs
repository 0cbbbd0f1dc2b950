//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartEvent, CartLine, ListenerKey},
    catalog::{
        Catalog, CatalogError, Facet, FilterError, FilterState, FilterTag, ListingQuery,
        PriceRange, SortOrder, query::CatalogueLink,
    },
    checkout::{
        CardDetails, Checkout, CheckoutError, CheckoutStep, OrderId, OrderTotals, PaymentMethod,
        ShippingAddress, ShippingDetails, ShippingMethod,
    },
    context::Storefront,
    fixtures::{Fixture, FixtureError},
    pricing::{PricingError, format_amount, parse_localized_price},
    products::{Availability, Product, ProductKey},
    receipt::{Receipt, ReceiptError},
    search::{SearchCursor, SearchEntry, SearchIndex, SearchResults},
};
