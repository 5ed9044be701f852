use super::ui;
use crate::api::Backend;
use crate::core::model::{Kind, Transaction};
use crate::core::{
    CustomRange, KindFilter, Period, SeriesPoint, Summary, aggregate, calendar, listing, money,
    period,
};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use comfy_table::{Cell, Color};
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub period: Period,
    /// Only consulted for [`Period::Custom`].
    pub range: CustomRange,
    /// Narrows the transaction list. The summary and the series ignore it.
    pub kind: KindFilter,
}

impl DashboardQuery {
    pub fn for_period(period: Period) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

/// Everything the dashboard shows, computed from one snapshot of transactions.
#[derive(Debug)]
pub struct Dashboard<'a> {
    pub period: Period,
    pub summary: Summary,
    pub series: Vec<SeriesPoint>,
    pub entries: Vec<&'a Transaction>,
}

impl<'a> Dashboard<'a> {
    pub fn build<Tz: TimeZone>(
        transactions: &'a [Transaction],
        query: &DashboardQuery,
        now: &DateTime<Tz>,
    ) -> Self {
        let tz = now.timezone();
        let in_period =
            period::filter_by_period(transactions, query.period, now, Some(&query.range));
        debug!(
            total = transactions.len(),
            in_period = in_period.len(),
            period = %query.period,
            "Filtered transactions"
        );

        Dashboard {
            period: query.period,
            summary: aggregate::summarize(in_period.iter().copied()),
            series: aggregate::to_series(in_period.iter().copied(), &tz),
            entries: listing::filter_and_sort(in_period.iter().copied(), query.kind, &tz),
        }
    }

    pub fn display<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let mut output = format!(
            "Dashboard ({})\n\n",
            ui::style_text(&self.period.to_string(), ui::StyleType::Title)
        );

        output.push_str(&self.summary_cards());
        output.push_str("\n\n");

        if !self.series.is_empty() {
            output.push_str(&self.series_table());
            output.push_str("\n\n");
        }

        if self.entries.is_empty() {
            output.push_str(&ui::style_text(
                "No transactions yet",
                ui::StyleType::Subtle,
            ));
        } else {
            output.push_str(&self.transaction_table(tz));
        }
        output
    }

    fn summary_cards(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Balance"),
            ui::header_cell("Income"),
            ui::header_cell("Expense"),
        ]);
        let balance_style = if self.summary.net.is_sign_negative() && !self.summary.net.is_zero() {
            ui::StyleType::Expense
        } else {
            ui::StyleType::TotalLabel
        };
        table.add_row(vec![
            Cell::new(ui::style_text(
                &money::format_rupiah(self.summary.net),
                balance_style,
            )),
            Cell::new(ui::style_text(
                &money::format_rupiah(self.summary.income),
                ui::StyleType::Income,
            )),
            Cell::new(ui::style_text(
                &money::format_rupiah(self.summary.expense),
                ui::StyleType::Expense,
            )),
        ]);
        table.to_string()
    }

    fn series_table(&self) -> String {
        let max = self
            .series
            .iter()
            .map(|p| p.signed_amount.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Net Flow"),
            ui::header_cell(""),
        ]);
        for point in &self.series {
            table.add_row(vec![
                Cell::new(&point.label),
                ui::signed_cell(point.kind, point.raw_amount),
                Cell::new(ui::bar(point.signed_amount, max)).fg(match point.kind {
                    Kind::Income => Color::Green,
                    Kind::Expense => Color::Red,
                }),
            ]);
        }
        table.to_string()
    }

    fn transaction_table<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Description"),
            ui::header_cell("Category"),
            ui::header_cell("Amount"),
        ]);
        for t in &self.entries {
            let date = calendar::parse_instant(&t.date, tz)
                .map_or_else(|| t.date.clone(), |dt| calendar::list_date(&dt));
            table.add_row(vec![
                Cell::new(date),
                Cell::new(&t.description),
                Cell::new(&t.category),
                ui::signed_cell(t.kind, t.amount),
            ]);
        }
        table.to_string()
    }
}

pub async fn run(
    backend: &dyn Backend,
    query: &DashboardQuery,
    now: &DateTime<chrono_tz::Tz>,
) -> Result<()> {
    let transactions = ui::with_spinner("Fetching transactions...", backend.list_transactions())
        .await
        .context("Failed to load transactions")?;

    let dashboard = Dashboard::build(&transactions, query, now);
    println!("{}", dashboard.display(&now.timezone()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::MockBackend;
    use chrono_tz::Asia::Jakarta;

    fn tx(id: &str, amount: i64, kind: Kind, date: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: format!("desc {id}"),
            amount: Decimal::from(amount),
            kind,
            category: "Umum".to_string(),
            date: date.to_string(),
        }
    }

    fn now() -> DateTime<chrono_tz::Tz> {
        Jakarta.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("a", 50000, Kind::Income, "2024-03-01"),
            tx("b", 20000, Kind::Expense, "2024-03-02"),
            tx("c", 10000, Kind::Income, "2024-03-03"),
            tx("old", 99000, Kind::Income, "2024-01-10"),
        ]
    }

    #[test]
    fn test_build_month_dashboard() {
        let transactions = sample();
        let dashboard = Dashboard::build(
            &transactions,
            &DashboardQuery::for_period(Period::Month),
            &now(),
        );

        assert_eq!(dashboard.summary.income, Decimal::from(60000));
        assert_eq!(dashboard.summary.expense, Decimal::from(20000));
        assert_eq!(dashboard.summary.net, Decimal::from(40000));

        let labels: Vec<_> = dashboard.series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1 Mar", "2 Mar", "3 Mar"]);

        let ids: Vec<_> = dashboard.entries.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_kind_filter_only_narrows_the_list() {
        let transactions = sample();
        let query = DashboardQuery {
            period: Period::All,
            kind: KindFilter::Expense,
            ..DashboardQuery::default()
        };
        let dashboard = Dashboard::build(&transactions, &query, &now());

        assert_eq!(dashboard.summary.income, Decimal::from(159000));
        assert_eq!(dashboard.series.len(), 4);
        assert_eq!(dashboard.entries.len(), 1);
        assert_eq!(dashboard.entries[0].id, "b");
    }

    #[test]
    fn test_custom_range() {
        let transactions = sample();
        let query = DashboardQuery {
            period: Period::Custom,
            range: CustomRange::parse("2024-03-02", "2024-03-03").unwrap(),
            kind: KindFilter::All,
        };
        let dashboard = Dashboard::build(&transactions, &query, &now());
        assert_eq!(dashboard.summary.net, Decimal::from(-10000));
        assert_eq!(dashboard.entries.len(), 2);
    }

    #[test]
    fn test_display_contains_cards_and_list() {
        let transactions = sample();
        let dashboard = Dashboard::build(
            &transactions,
            &DashboardQuery::for_period(Period::Month),
            &now(),
        );
        let output = dashboard.display(&Jakarta);

        assert!(output.contains("Rp 40.000"));
        assert!(output.contains("Rp 60.000"));
        assert!(output.contains("+Rp 50.000"));
        assert!(output.contains("-Rp 20.000"));
        assert!(output.contains("3/3/2024"));
        assert!(!output.contains("No transactions yet"));
    }

    #[test]
    fn test_display_empty_period() {
        let transactions = sample();
        let dashboard = Dashboard::build(
            &transactions,
            &DashboardQuery::for_period(Period::Today),
            &now(),
        );
        let output = dashboard.display(&Jakarta);
        assert!(output.contains("Rp 0"));
        assert!(output.contains("No transactions yet"));
    }

    #[tokio::test]
    async fn test_run_propagates_unauthorized() {
        let backend = MockBackend {
            unauthorized: true,
            ..MockBackend::default()
        };
        let err = run(&backend, &DashboardQuery::default(), &now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load transactions"));
        let api_err = err.downcast_ref::<crate::api::ApiError>().unwrap();
        assert!(api_err.is_unauthorized());
    }
}
