use super::ui;
use crate::api::Backend;
use crate::api::payload::ProductDraft;
use crate::core::catalog;
use crate::core::model::{Product, Unit};
use anyhow::{Context, Result, anyhow};
use comfy_table::Cell;
use tracing::info;

pub fn display_products(products: &[&Product]) -> String {
    if products.is_empty() {
        return ui::style_text("No products found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Product"),
        ui::header_cell("Default Unit"),
    ]);
    for product in products {
        table.add_row(vec![
            Cell::new(ui::style_text(&product.id, ui::StyleType::Subtle)),
            Cell::new(&product.name),
            Cell::new(product.default_unit),
        ]);
    }
    table.to_string()
}

async fn fetch(backend: &dyn Backend) -> Result<Vec<Product>> {
    ui::with_spinner("Fetching products...", backend.list_products())
        .await
        .context("Failed to load products")
}

/// Lists the catalog, optionally narrowed by a name search.
pub async fn list(backend: &dyn Backend, search: Option<&str>) -> Result<()> {
    let products = fetch(backend).await?;
    let matches = catalog::search(&products, search.unwrap_or_default());

    if let Some(term) = search {
        println!(
            "{} of {} products match {:?}\n",
            matches.len(),
            products.len(),
            term
        );
    }
    println!("{}", display_products(&matches));
    Ok(())
}

pub async fn add(backend: &dyn Backend, draft: &ProductDraft) -> Result<()> {
    draft.validate()?;
    backend
        .create_product(draft)
        .await
        .with_context(|| format!("Failed to add product {}", draft.name))?;
    info!(name = %draft.name, "Product added");

    list(backend, None).await
}

/// Updates the fields that were given and keeps the rest.
pub async fn edit(
    backend: &dyn Backend,
    id: &str,
    name: Option<String>,
    default_unit: Option<Unit>,
) -> Result<()> {
    let products = fetch(backend).await?;
    let existing =
        catalog::find(&products, id).ok_or_else(|| anyhow!("Product not found: {}", id))?;

    let draft = merge(existing, name, default_unit);
    draft.validate()?;
    backend
        .update_product(id, &draft)
        .await
        .with_context(|| format!("Failed to update product {id}"))?;
    info!(id, "Product updated");

    list(backend, None).await
}

pub async fn delete(backend: &dyn Backend, id: &str) -> Result<()> {
    backend
        .delete_product(id)
        .await
        .with_context(|| format!("Failed to delete product {id}"))?;
    info!(id, "Product deleted");

    list(backend, None).await
}

fn merge(existing: &Product, name: Option<String>, default_unit: Option<Unit>) -> ProductDraft {
    ProductDraft {
        name: name.unwrap_or_else(|| existing.name.clone()),
        default_unit: default_unit.unwrap_or(existing.default_unit),
    }
}
