//! Rupiah formatting.

use crate::core::model::Kind;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as whole Rupiah with `.` thousands separators,
/// e.g. `Rp 1.250.000` or `-Rp 20.000`.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Formats a transaction amount with the sign of its kind: `+Rp 50.000` or `-Rp 20.000`.
pub fn format_signed(kind: Kind, amount: Decimal) -> String {
    let sign = match kind {
        Kind::Income => '+',
        Kind::Expense => '-',
    };
    format!("{sign}{}", format_rupiah(amount.abs()))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
