//! Transaction list: narrowing by kind and ordering newest first.

use crate::core::calendar;
use crate::core::model::{Kind, Transaction};
use anyhow::anyhow;
use chrono::TimeZone;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn matches(self, kind: Kind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == Kind::Income,
            KindFilter::Expense => kind == Kind::Expense,
        }
    }
}

impl From<Kind> for KindFilter {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => KindFilter::Income,
            Kind::Expense => KindFilter::Expense,
        }
    }
}

impl Display for KindFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindFilter::All => write!(f, "all"),
            KindFilter::Income => write!(f, "{}", Kind::Income),
            KindFilter::Expense => write!(f, "{}", Kind::Expense),
        }
    }
}

impl FromStr for KindFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        s.parse::<Kind>()
            .map(KindFilter::from)
            .map_err(|_| anyhow!("Invalid kind filter: {} (expected all, income or expense)", s))
    }
}

/// Keeps the transactions matching `filter`, most recent first.
///
/// Equal dates keep their input order. Unparsable dates sort last.
pub fn filter_and_sort<'a, I, Tz>(transactions: I, filter: KindFilter, tz: &Tz) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
    Tz: TimeZone,
{
    let mut dated: Vec<_> = transactions
        .into_iter()
        .filter(|t| filter.matches(t.kind))
        .map(|t| (calendar::parse_instant(&t.date, tz), t))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn tx(id: &str, kind: Kind, date: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: id.to_string(),
            amount: Decimal::from(1000),
            kind,
            category: "Umum".to_string(),
            date: date.to_string(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("a", Kind::Income, "2024-03-01"),
            tx("b", Kind::Expense, "2024-03-05"),
            tx("c", Kind::Income, "2024-03-05"),
            tx("d", Kind::Expense, "bad date"),
            tx("e", Kind::Income, "2024-03-03T10:00:00Z"),
            tx("f", Kind::Expense, "2024-03-05"),
        ]
    }

    fn ids(txs: &[&Transaction]) -> Vec<String> {
        txs.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_all_is_a_permutation_sorted_newest_first() {
        let txs = sample();
        let sorted = filter_and_sort(&txs, KindFilter::All, &Utc);
        assert_eq!(ids(&sorted), vec!["b", "c", "f", "e", "a", "d"]);
    }

    #[test]
    fn test_income_only() {
        let txs = sample();
        let sorted = filter_and_sort(&txs, KindFilter::Income, &Utc);
        assert_eq!(ids(&sorted), vec!["c", "e", "a"]);
        assert!(sorted.iter().all(|t| t.kind == Kind::Income));
    }

    #[test]
    fn test_expense_only_keeps_tie_order() {
        let txs = sample();
        let sorted = filter_and_sort(&txs, KindFilter::Expense, &Utc);
        assert_eq!(ids(&sorted), vec!["b", "f", "d"]);
    }

    #[test]
    fn test_output_is_non_increasing() {
        let txs = sample();
        let sorted = filter_and_sort(&txs, KindFilter::All, &Utc);
        let dates: Vec<_> = sorted
            .iter()
            .map(|t| calendar::parse_instant(&t.date, &Utc))
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_kind_filter_from_str() {
        assert_eq!("all".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!("pengeluaran".parse::<KindFilter>().unwrap(), KindFilter::Expense);
        assert_eq!("Income".parse::<KindFilter>().unwrap(), KindFilter::Income);
        assert!("both".parse::<KindFilter>().is_err());
    }
}
