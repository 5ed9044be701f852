//! Calendar-relative periods used to narrow the dashboard.

use crate::core::calendar;
use crate::core::model::Transaction;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    All,
    Today,
    /// Week to date: from the most recent Sunday, with no upper bound.
    Week,
    /// The whole calendar month containing the reference instant.
    #[default]
    Month,
    /// The whole calendar year containing the reference instant.
    Year,
    Custom,
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::All => "all",
                Period::Today => "today",
                Period::Week => "week",
                Period::Month => "month",
                Period::Year => "year",
                Period::Custom => "custom",
            }
        )
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "custom" => Ok(Period::Custom),
            _ => Err(anyhow!("Invalid period: {}", s)),
        }
    }
}

/// Inclusive calendar-date bounds for [`Period::Custom`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CustomRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parses `YYYY-MM-DD` bounds. A blank bound is left open.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_bound(start).context("Invalid custom range start")?,
            end: parse_bound(end).context("Invalid custom range end")?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Half-open instant window `[start midnight, end midnight + 24h)`.
    fn window<Tz: TimeZone>(&self, tz: &Tz) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        let start = calendar::local_midnight(self.start?, tz)?;
        let end = calendar::local_midnight(self.end?, tz)? + Duration::hours(24);
        Some((start, end))
    }
}

fn parse_bound(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("expected YYYY-MM-DD, got {raw:?}"))
}

/// Decides whether `transaction` falls inside `period` as seen from `now`.
///
/// `all` and an incomplete custom range accept everything. Otherwise a date
/// that cannot be parsed never matches.
pub fn classify<Tz: TimeZone>(
    transaction: &Transaction,
    period: Period,
    now: &DateTime<Tz>,
    custom: Option<&CustomRange>,
) -> bool {
    let range = match (period, custom) {
        (Period::All, _) => return true,
        (Period::Custom, Some(range)) if range.is_complete() => Some(range),
        (Period::Custom, _) => return true,
        _ => None,
    };

    let tz = now.timezone();
    let Some(date) = calendar::parse_instant(&transaction.date, &tz) else {
        trace!(id = %transaction.id, date = %transaction.date, "Unparsable transaction date");
        return false;
    };

    match period {
        Period::Today => calendar::start_of_day(now)
            .is_some_and(|start| date >= start && date < start + Duration::hours(24)),
        Period::Week => calendar::start_of_week(now).is_some_and(|start| date >= start),
        Period::Month => date.year() == now.year() && date.month() == now.month(),
        Period::Year => date.year() == now.year(),
        Period::Custom => range
            .and_then(|r| r.window(&tz))
            .is_some_and(|(start, end)| date >= start && date < end),
        Period::All => true,
    }
}

/// Keeps the transactions inside `period`, in input order.
pub fn filter_by_period<'a, Tz: TimeZone>(
    transactions: &'a [Transaction],
    period: Period,
    now: &DateTime<Tz>,
    custom: Option<&CustomRange>,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| classify(t, period, now, custom))
        .collect()
}
