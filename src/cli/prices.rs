use super::ui;
use crate::api::Backend;
use crate::api::payload::NewPriceRecord;
use crate::core::model::{PriceRecord, Product, Unit};
use crate::core::{ComparedPrice, calendar, catalog, money, price_history};
use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, TimeZone};
use comfy_table::Cell;
use futures::future::try_join;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Price records with comparisons, newest first, optionally for one product.
///
/// Comparisons are computed over each product's full history before the
/// product filter applies.
pub fn history<'a, Tz: TimeZone>(
    records: &'a [PriceRecord],
    product_id: Option<&str>,
    tz: &Tz,
) -> Vec<ComparedPrice<'a>> {
    let mut entries: Vec<_> = price_history::fill_comparisons(records, tz)
        .into_iter()
        .filter(|e| product_id.is_none_or(|id| e.record.product_id() == id))
        .map(|e| (calendar::parse_instant(&e.record.recorded_at, tz), e))
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries.into_iter().map(|(_, e)| e).collect()
}

/// Catalog with the number of price records per product.
pub fn display_counts(products: &[Product], records: &[PriceRecord]) -> String {
    let counts = price_history::count_by_product(records);
    let mut output = format!("All products ({} data)", records.len());
    for product in products {
        let count = counts.get(product.id.as_str()).copied().unwrap_or(0);
        output.push_str(&format!("\n  {} ({} data)", product.name, count));
    }
    output
}

pub fn display_history<Tz: TimeZone>(entries: &[ComparedPrice<'_>], tz: &Tz) -> String {
    if entries.is_empty() {
        return ui::style_text("No price records yet", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Product"),
        ui::header_cell("Price"),
        ui::header_cell("Unit"),
        ui::header_cell("Change"),
        ui::header_cell("Previous"),
    ]);

    for entry in entries {
        let record = entry.record;
        let date = calendar::parse_instant(&record.recorded_at, tz)
            .map_or_else(|| record.recorded_at.clone(), |dt| calendar::list_date(&dt));
        let previous = entry
            .comparison
            .as_ref()
            .map_or_else(ui::na_cell, |c| ui::money_cell(c.previous_price));

        table.add_row(vec![
            Cell::new(date),
            Cell::new(&record.product.name),
            ui::money_cell(record.price),
            Cell::new(format!("per {}", record.unit.to_string().to_uppercase())),
            ui::comparison_cell(entry.comparison.as_ref()),
            previous,
        ]);
    }
    table.to_string()
}

async fn load(backend: &dyn Backend) -> Result<(Vec<Product>, Vec<PriceRecord>)> {
    ui::with_spinner(
        "Fetching prices...",
        try_join(backend.list_products(), backend.list_prices()),
    )
    .await
    .context("Failed to load price history")
}

/// Shows the price history, newest first.
pub async fn show(
    backend: &dyn Backend,
    product_id: Option<&str>,
    now: &chrono::DateTime<chrono_tz::Tz>,
) -> Result<()> {
    let (products, records) = load(backend).await?;
    if let Some(id) = product_id {
        catalog::find(&products, id).ok_or_else(|| anyhow!("Product not found: {}", id))?;
    }

    let tz = now.timezone();
    let entries = history(&records, product_id, &tz);
    debug!(records = records.len(), shown = entries.len(), "Built price history");

    println!("{}\n", display_counts(&products, &records));
    println!("{}", display_history(&entries, &tz));
    Ok(())
}

/// Records a price, then shows that product's history.
///
/// Without an explicit unit the product's default unit is used.
pub async fn record(
    backend: &dyn Backend,
    product_id: &str,
    price: Decimal,
    unit: Option<Unit>,
    recorded_at: NaiveDate,
    now: &chrono::DateTime<chrono_tz::Tz>,
) -> Result<()> {
    let products = backend
        .list_products()
        .await
        .context("Failed to load products")?;
    let product = catalog::find(&products, product_id)
        .ok_or_else(|| anyhow!("Product not found: {}", product_id))?;

    let new_record = NewPriceRecord {
        product_id: product.id.clone(),
        price,
        unit: unit.unwrap_or(product.default_unit),
        recorded_at,
    };
    new_record.validate()?;

    ui::with_spinner("Saving price...", backend.record_price(&new_record))
        .await
        .with_context(|| format!("Failed to record price for {}", product.name))?;
    info!(product = %product.name, price = %price, "Price recorded");
    println!(
        "Recorded {} per {} for {}\n",
        money::format_rupiah(new_record.price),
        new_record.unit,
        product.name
    );

    show(backend, Some(product_id), now).await
}
