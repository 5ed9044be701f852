//! Dashboard totals and the net cash-flow series.

use crate::core::calendar;
use crate::core::model::{Kind, Transaction};
use chrono::TimeZone;
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    /// Always `income - expense`.
    pub net: Decimal,
}

/// One chart point per transaction. Points are independent, not a running balance.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub signed_amount: Decimal,
    pub raw_amount: Decimal,
    pub kind: Kind,
}

/// Totals per kind. Sums that leave the `Decimal` range saturate at its bounds.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expense) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), t| match t.kind {
            Kind::Income => (accumulate(income, t.amount), expense),
            Kind::Expense => (income, accumulate(expense, t.amount)),
        },
    );

    Summary {
        income,
        expense,
        net: income.saturating_sub(expense),
    }
}

fn accumulate(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        debug!(%total, %amount, "Summary total overflowed, saturating");
        total.saturating_add(amount)
    })
}

/// Builds the chart series in ascending date order.
///
/// The sort is stable, and an unparsable date counts as the earliest instant.
/// Such points keep their raw date string as label.
pub fn to_series<'a, I, Tz>(transactions: I, tz: &Tz) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
    Tz: TimeZone,
{
    let mut dated: Vec<_> = transactions
        .into_iter()
        .map(|t| (calendar::parse_instant(&t.date, tz), t))
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    dated
        .into_iter()
        .map(|(date, t)| SeriesPoint {
            label: date
                .as_ref()
                .map_or_else(|| t.date.clone(), calendar::chart_label),
            signed_amount: t.signed_amount(),
            raw_amount: t.amount,
            kind: t.kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(id: &str, amount: i64, kind: Kind, date: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: id.to_string(),
            amount: Decimal::from(amount),
            kind,
            category: "Umum".to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_summary_scenario() {
        let txs = vec![
            tx("a", 50000, Kind::Income, "2024-03-01"),
            tx("b", 20000, Kind::Expense, "2024-03-02"),
            tx("c", 10000, Kind::Income, "2024-03-03"),
        ];

        let summary = summarize(&txs);
        assert_eq!(
            summary,
            Summary {
                income: Decimal::from(60000),
                expense: Decimal::from(20000),
                net: Decimal::from(40000),
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let txs: Vec<Transaction> = Vec::new();
        assert_eq!(summarize(&txs), Summary::default());
        assert!(to_series(&txs, &Utc).is_empty());
    }

    #[test]
    fn test_overflowing_totals_saturate() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let mut txs = vec![
            tx("a", 0, Kind::Income, "2024-03-01"),
            tx("b", 0, Kind::Income, "2024-03-02"),
            tx("c", 0, Kind::Expense, "2024-03-03"),
        ];
        for t in &mut txs {
            t.amount = huge;
        }

        let summary = summarize(&txs);
        assert_eq!(summary.income, Decimal::MAX);
        assert_eq!(summary.expense, huge);
        assert_eq!(summary.net, Decimal::MAX - huge);
    }

    #[test]
    fn test_net_is_income_minus_expense() {
        let txs = vec![
            tx("a", 1500, Kind::Expense, "2024-03-01"),
            tx("b", 0, Kind::Income, "2024-03-01"),
            tx("c", 700, Kind::Income, "garbage"),
            tx("d", 2300, Kind::Expense, "2024-03-04"),
        ];
        let summary = summarize(&txs);
        assert_eq!(summary.net, summary.income - summary.expense);
        assert_eq!(summary.net, Decimal::from(-3100));
    }

    #[test]
    fn test_series_sorted_ascending_and_signed() {
        let txs = vec![
            tx("late", 20000, Kind::Expense, "2024-03-10"),
            tx("early", 50000, Kind::Income, "2024-03-01"),
            tx("mid", 10000, Kind::Income, "2024-03-05T12:00:00Z"),
        ];
        let series = to_series(&txs, &Utc);

        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1 Mar", "5 Mar", "10 Mar"]);
        assert_eq!(series[2].signed_amount, Decimal::from(-20000));
        assert_eq!(series[2].raw_amount, Decimal::from(20000));
        assert_eq!(series[2].kind, Kind::Expense);
        assert_eq!(series[0].signed_amount, Decimal::from(50000));
    }

    #[test]
    fn test_series_is_stable_for_equal_dates() {
        let txs = vec![
            tx("first", 1, Kind::Income, "2024-03-02"),
            tx("second", 2, Kind::Expense, "2024-03-02"),
            tx("zero", 3, Kind::Income, "2024-03-01"),
            tx("third", 4, Kind::Income, "2024-03-02"),
        ];
        let series = to_series(&txs, &Utc);
        let amounts: Vec<Decimal> = series.iter().map(|p| p.raw_amount).collect();
        assert_eq!(
            amounts,
            vec![
                Decimal::from(3),
                Decimal::from(1),
                Decimal::from(2),
                Decimal::from(4)
            ]
        );
    }

    #[test]
    fn test_series_puts_unparsable_dates_first() {
        let txs = vec![
            tx("ok", 1, Kind::Income, "2024-03-02"),
            tx("bad", 2, Kind::Income, "sometime"),
        ];
        let series = to_series(&txs, &Utc);
        assert_eq!(series[0].label, "sometime");
        assert_eq!(series[1].label, "2 Mar");
    }
}
