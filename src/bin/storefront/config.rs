//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use storefront::{catalog::SortOrder, checkout::ShippingMethod};

/// Storefront CLI
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog, cart and checkout", long_about = None)]
pub(crate) struct Cli {
    /// Fixture directory
    #[arg(long, global = true, env = "STOREFRONT_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Catalog fixture name
    #[arg(long, global = true, env = "STOREFRONT_CATALOG", default_value = "default")]
    pub catalog: String,

    /// Cart fixture name
    #[arg(long, global = true, env = "STOREFRONT_CART", default_value = "default")]
    pub cart: String,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load configuration from `.env` and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Missing .env is fine
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print the filtered and sorted catalogue listing
    Catalog(CatalogArgs),

    /// Print autocomplete suggestions for a query
    Search(SearchArgs),

    /// Print the cart, optionally adding products first
    Cart(CartArgs),

    /// Run the cart through checkout and print the receipt
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Listing query string, e.g. `franchise=Pokemon&availability=En+Stock`
    #[arg(long, default_value = "")]
    pub query: String,

    /// Sort order; overrides any `sort` in the query string
    #[arg(long, value_parser = parse_sort_order)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Search text
    pub query: String,
}

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Product ids to add, in order
    #[arg(long = "add", value_name = "ID")]
    pub add: Vec<String>,
}

/// Payment choice at the payment step.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum PaymentChoice {
    /// Card payment
    Card,

    /// PayPal redirect
    Paypal,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Shipping method (colissimo, mondial-relay, colissimo-express)
    #[arg(long, value_parser = parse_shipping_method, default_value = "colissimo")]
    pub method: ShippingMethod,

    /// Payment option
    #[arg(long, value_enum, default_value_t = PaymentChoice::Card)]
    pub payment: PaymentChoice,

    /// Name on the card
    #[arg(long, env = "STOREFRONT_CARD_HOLDER", default_value = "")]
    pub card_holder: String,
}

fn parse_sort_order(slug: &str) -> Result<SortOrder, String> {
    SortOrder::from_slug(slug).ok_or_else(|| {
        let known: Vec<&str> = SortOrder::ALL.iter().map(|order| order.slug()).collect();

        format!(
            "unknown sort order `{slug}`, expected one of: {}",
            known.join(", ")
        )
    })
}

fn parse_shipping_method(slug: &str) -> Result<ShippingMethod, String> {
    ShippingMethod::from_slug(slug).ok_or_else(|| {
        let known: Vec<&str> = ShippingMethod::ALL
            .iter()
            .map(|method| method.slug())
            .collect();

        format!(
            "unknown shipping method `{slug}`, expected one of: {}",
            known.join(", ")
        )
    })
}
