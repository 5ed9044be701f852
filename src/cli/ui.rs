use crate::core::model::{Comparison, Direction, Kind};
use crate::core::money;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::future::Future;
use std::time::Duration;

const BAR_WIDTH: usize = 24;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Income,
    Expense,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Income => style(text).green().bold(),
        StyleType::Expense => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned Rupiah amount.
pub fn money_cell(amount: Decimal) -> Cell {
    Cell::new(money::format_rupiah(amount)).set_alignment(CellAlignment::Right)
}

/// Amount prefixed with the sign of its kind, green for income and red for expense.
pub fn signed_cell(kind: Kind, amount: Decimal) -> Cell {
    let color = match kind {
        Kind::Income => Color::Green,
        Kind::Expense => Color::Red,
    };
    Cell::new(money::format_signed(kind, amount))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Price change badge, e.g. `+20% (+Rp 200)`.
///
/// A rising price costs the shop more, so it is shown in red.
pub fn comparison_cell(comparison: Option<&Comparison>) -> Cell {
    let Some(comparison) = comparison else {
        return na_cell();
    };

    let sign = if comparison.direction == Direction::Up { "+" } else { "" };
    let percent = comparison
        .percent
        .map_or_else(|| "n/a".to_string(), |p| format!("{sign}{p}%"));
    let text = format!(
        "{percent} ({sign}{})",
        money::format_rupiah(comparison.delta)
    );

    let color = match comparison.direction {
        Direction::Up => Color::Red,
        Direction::Down => Color::Green,
        Direction::Flat => Color::DarkGrey,
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Dimmed "N/A" cell for values that do not exist yet.
pub fn na_cell() -> Cell {
    Cell::new("N/A").fg(Color::DarkGrey)
}

/// Horizontal bar proportional to `value / max`, at least one block for non-zero values.
pub fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() || value.is_zero() {
        return String::new();
    }
    let ratio = (value.abs() / max.abs()).min(Decimal::ONE);
    let blocks = (ratio * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .max(1);
    "█".repeat(blocks)
}

/// Creates a new `indicatif::ProgressBar` spinner with standard styling.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Awaits `future` while a spinner is shown.
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = new_spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}
