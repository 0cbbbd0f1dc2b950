//! Subcommand handlers

use std::io::{self, Write};

use rusty_money::{Money, iso::Currency};
use storefront::{
    cart::CartError,
    catalog::ListingQuery,
    checkout::{CardDetails, CheckoutError, CheckoutStep, PaymentMethod},
    fixtures::{Fixture, FixtureError},
    pricing::{PricingError, format_amount},
    receipt::ReceiptError,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::info;

use crate::config::{CartArgs, CatalogArgs, CheckoutArgs, Cli, Commands, PaymentChoice, SearchArgs};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    /// Fixture files could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Cart update was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout transition was refused.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Receipt could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// `--add` named a product that isn't in the catalog.
    #[error("no product with id `{0}`")]
    UnknownProduct(String),

    /// Checkout stopped before confirmation.
    #[error("checkout stopped at the {0} step")]
    Incomplete(CheckoutStep),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub(crate) fn run(cli: Cli) -> Result<(), CommandError> {
    let mut fixture = Fixture::with_base_path(&cli.fixtures);

    fixture.load_catalog(&cli.catalog)?;

    if matches!(cli.command, Commands::Cart(_) | Commands::Checkout(_)) {
        fixture.load_cart(&cli.cart)?;
    }

    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Catalog(args) => catalog(&fixture, &args, &mut out),
        Commands::Search(args) => search(fixture, &args, &mut out),
        Commands::Cart(args) => cart(fixture, &args, &mut out),
        Commands::Checkout(args) => checkout(fixture, args, &mut out),
    }
}

fn catalog(
    fixture: &Fixture,
    args: &CatalogArgs,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let catalog = fixture.catalog()?;
    let ListingQuery { filters, sort } = ListingQuery::parse(&args.query, &catalog);
    let sort = args.sort.unwrap_or(sort);

    let products = catalog.listing(&filters, sort);

    let mut builder = Builder::default();

    builder.push_record([
        "ID",
        "Produit",
        "Franchise",
        "Categorie",
        "Stock",
        "Note",
        "Prix",
    ]);

    for product in &products {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            product.franchise.clone(),
            product.category.clone(),
            product.availability.label().to_string(),
            format!("{} ({})", product.rating, product.review_count),
            euros(&product.price),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..), Alignment::right());

    writeln!(out, "{table}")?;

    let tags: Vec<String> = filters.active_tags().into_iter().map(|tag| tag.label).collect();

    if !tags.is_empty() {
        writeln!(out, "Filtres: {}", tags.join(", "))?;
    }

    writeln!(out, "{} produits, tri: {}", products.len(), sort.label())?;

    Ok(())
}

fn search(fixture: Fixture, args: &SearchArgs, out: &mut impl Write) -> Result<(), CommandError> {
    let storefront = fixture.into_storefront()?;
    let results = storefront.search(&args.query);

    if results.is_empty() {
        writeln!(out, "Aucun resultat pour \"{}\"", args.query)?;

        return Ok(());
    }

    if !results.products.is_empty() {
        writeln!(out, "Produits")?;

        for product in &results.products {
            writeln!(
                out,
                "  {}  {}  {}",
                product.name,
                product.franchise,
                euros(&product.price)
            )?;
        }
    }

    if !results.categories.is_empty() {
        writeln!(out, "Categories")?;

        for category in &results.categories {
            writeln!(out, "  {}  ({} produits)", category.name, category.count)?;
        }
    }

    if !results.franchises.is_empty() {
        writeln!(out, "Franchises")?;

        for franchise in &results.franchises {
            writeln!(out, "  {}  {}", franchise.name, franchise.jp)?;
        }
    }

    Ok(())
}

fn cart(fixture: Fixture, args: &CartArgs, out: &mut impl Write) -> Result<(), CommandError> {
    let mut storefront = fixture.into_storefront()?;

    for id in &args.add {
        let quantity = storefront
            .add_to_cart(id)?
            .ok_or_else(|| CommandError::UnknownProduct(id.clone()))?;

        info!(id, quantity = quantity.get(), "added to cart");
    }

    let cart = &storefront.cart;

    if cart.is_empty() {
        writeln!(out, "Votre panier est vide")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Article", "Prix", "Qte", "Total"]);

    for line in cart.lines() {
        builder.push_record([
            line.id().to_string(),
            line.name().to_string(),
            euros(&line.unit_price()),
            line.quantity().to_string(),
            euros(&line.line_total()?),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "Articles: {}", cart.total_items())?;
    writeln!(out, "Total: {} €", cart.formatted_total_price()?)?;

    Ok(())
}

fn checkout(
    fixture: Fixture,
    args: CheckoutArgs,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut storefront = fixture.into_storefront()?;
    let mut checkout = storefront.begin_checkout();

    checkout.set_shipping_method(args.method);
    checkout.set_payment(match args.payment {
        PaymentChoice::Card => PaymentMethod::Card(CardDetails {
            holder: args.card_holder,
            ..CardDetails::default()
        }),
        PaymentChoice::Paypal => PaymentMethod::PayPal,
    });

    while checkout.step() != CheckoutStep::Confirmation {
        checkout.advance()?;
    }

    let receipt = checkout
        .receipt()
        .ok_or(CommandError::Incomplete(checkout.step()))?;

    receipt.write_to(&mut *out)?;

    writeln!(out, "Paiement: {}", checkout.payment())?;

    Ok(())
}

fn euros(money: &Money<'_, Currency>) -> String {
    format!("{} €", format_amount(money))
}
