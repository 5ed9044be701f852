//! Calendar helpers shared by the period filter, the chart series and the
//! price history.
//!
//! Every function takes the time zone explicitly so results never depend on
//! the zone of the machine running them.

use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a stored date into an instant in `tz`.
///
/// Accepts RFC 3339 timestamps (converted into `tz`), naive date-times and
/// plain `YYYY-MM-DD` dates (both read as local to `tz`). Returns `None` for
/// anything else.
pub fn parse_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, format) {
            return resolve_local(&ndt, tz);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| local_midnight(date, tz))
}

/// Start of `date` in `tz`.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    resolve_local(&date.and_time(NaiveTime::MIN), tz)
}

/// Maps a wall-clock time to an instant. Ambiguous times take the earlier
/// instant, times inside a DST gap move forward by an hour.
fn resolve_local<Tz: TimeZone>(ndt: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(ndt)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*ndt + Duration::hours(1))).earliest())
}

/// Midnight at the start of the day containing `now`.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    local_midnight(now.date_naive(), &now.timezone())
}

/// Midnight of the most recent Sunday on or before `now`.
pub fn start_of_week<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let today = now.date_naive();
    let days_since_sunday = u64::from(today.weekday().num_days_from_sunday());
    today
        .checked_sub_days(Days::new(days_since_sunday))
        .and_then(|sunday| local_midnight(sunday, &now.timezone()))
}

/// Short chart label: day and abbreviated month, e.g. `5 Mar`, `17 Agu`.
pub fn chart_label<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{} {}", dt.day(), MONTH_ABBREVIATIONS[dt.month0() as usize])
}

/// Numeric list date, e.g. `5/3/2024`.
pub fn list_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{}/{}/{}", dt.day(), dt.month(), dt.year())
}
