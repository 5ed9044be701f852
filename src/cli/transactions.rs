use super::ui;
use crate::api::Backend;
use crate::api::payload::NewTransaction;
use crate::core::money;
use anyhow::{Context, Result};
use tracing::info;

/// Submits a new transaction. The caller refetches afterwards.
pub async fn add(backend: &dyn Backend, transaction: &NewTransaction) -> Result<()> {
    transaction.validate()?;

    ui::with_spinner(
        "Saving transaction...",
        backend.create_transaction(transaction),
    )
    .await
    .context("Failed to save transaction")?;

    info!(kind = %transaction.kind, date = %transaction.date, "Transaction saved");
    println!(
        "Saved {} {} ({}) on {}",
        transaction.kind,
        money::format_signed(transaction.kind, transaction.amount),
        transaction.description,
        transaction.date.format("%-d/%-m/%Y"),
    );
    Ok(())
}
