//! Price history and period-over-period comparison per product.
//!
//! Each record is compared with the record immediately before it for the same
//! product. Records are ordered by `recorded_at`; records on the same date
//! keep the order they arrived in, which is the storage insertion order.

use crate::core::calendar;
use crate::core::model::{Comparison, Direction, PriceRecord};
use chrono::TimeZone;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparedPrice<'a> {
    pub record: &'a PriceRecord,
    /// `None` for the first record of a product.
    pub comparison: Option<Comparison>,
}

/// Compares `price` against `previous_price`.
///
/// The percentage is rounded half up to whole points. When the previous
/// price is zero the percentage is `Some(0)` if nothing moved and `None`
/// otherwise.
pub fn compare(previous_price: Decimal, price: Decimal) -> Comparison {
    let delta = price.saturating_sub(previous_price);
    let direction = match delta.cmp(&Decimal::ZERO) {
        Ordering::Greater => Direction::Up,
        Ordering::Less => Direction::Down,
        Ordering::Equal => Direction::Flat,
    };

    let percent = if previous_price.is_zero() {
        delta.is_zero().then_some(Decimal::ZERO)
    } else {
        delta
            .checked_div(previous_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(round_half_up)
    };

    Comparison {
        delta,
        percent,
        direction,
        previous_price,
    }
}

fn round_half_up(value: Decimal) -> Option<Decimal> {
    value.checked_add(Decimal::new(5, 1)).map(|v| v.floor())
}

/// Orders one product's records chronologically and attaches comparisons.
///
/// Callers partition by product first, see [`group_by_product`].
pub fn with_comparisons<'a, I, Tz>(records: I, tz: &Tz) -> Vec<ComparedPrice<'a>>
where
    I: IntoIterator<Item = &'a PriceRecord>,
    Tz: TimeZone,
{
    let mut dated: Vec<_> = records
        .into_iter()
        .map(|r| (calendar::parse_instant(&r.recorded_at, tz), r))
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    let mut previous: Option<&PriceRecord> = None;
    dated
        .into_iter()
        .map(|(_, record)| {
            let comparison = previous.map(|prev| compare(prev.price, record.price));
            previous = Some(record);
            ComparedPrice { record, comparison }
        })
        .collect()
}

/// Splits records by product id, products in order of first appearance.
pub fn group_by_product(records: &[PriceRecord]) -> Vec<(&str, Vec<&PriceRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&PriceRecord>)> = Vec::new();

    for record in records {
        let id = record.product_id();
        match index.get(id) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(id, groups.len());
                groups.push((id, vec![record]));
            }
        }
    }
    groups
}

/// Number of records per product id.
pub fn count_by_product(records: &[PriceRecord]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.product_id()).or_insert(0) += 1;
    }
    counts
}

/// Attaches a comparison to every record in a mixed-product list.
///
/// Comparisons already supplied by the server are kept. Missing ones are
/// computed from the product's full history. Output is grouped by product,
/// each group in ascending date order.
pub fn fill_comparisons<'a, Tz: TimeZone>(
    records: &'a [PriceRecord],
    tz: &Tz,
) -> Vec<ComparedPrice<'a>> {
    let mut filled = Vec::with_capacity(records.len());
    let mut computed = 0usize;

    for (_, group) in group_by_product(records) {
        for mut entry in with_comparisons(group, tz) {
            if let Some(server) = &entry.record.comparison {
                entry.comparison = Some(server.clone());
            } else if entry.comparison.is_some() {
                computed += 1;
            }
            filled.push(entry);
        }
    }

    debug!(records = records.len(), computed, "Filled price comparisons");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Product, Unit};
    use chrono::Utc;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            default_unit: Unit::Kg,
        }
    }

    fn record(id: &str, product_id: &str, price: i64, date: &str) -> PriceRecord {
        PriceRecord {
            id: id.to_string(),
            product: product(product_id),
            price: Decimal::from(price),
            unit: Unit::Kg,
            recorded_at: date.to_string(),
            comparison: None,
        }
    }

    #[test]
    fn test_single_record_has_no_comparison() {
        let records = vec![record("r1", "beras", 12000, "2024-01-01")];
        let compared = with_comparisons(&records, &Utc);
        assert_eq!(compared.len(), 1);
        assert!(compared[0].comparison.is_none());
    }

    #[test]
    fn test_comparison_scenario() {
        let records = vec![
            record("r1", "beras", 1000, "2024-01-01"),
            record("r2", "beras", 1200, "2024-02-01"),
            record("r3", "beras", 900, "2024-03-01"),
        ];
        let compared = with_comparisons(&records, &Utc);

        assert!(compared[0].comparison.is_none());
        assert_eq!(
            compared[1].comparison,
            Some(Comparison {
                delta: Decimal::from(200),
                percent: Some(Decimal::from(20)),
                direction: Direction::Up,
                previous_price: Decimal::from(1000),
            })
        );
        assert_eq!(
            compared[2].comparison,
            Some(Comparison {
                delta: Decimal::from(-300),
                percent: Some(Decimal::from(-25)),
                direction: Direction::Down,
                previous_price: Decimal::from(1200),
            })
        );
    }

    #[test]
    fn test_input_order_does_not_matter_for_distinct_dates() {
        let records = vec![
            record("r3", "beras", 900, "2024-03-01"),
            record("r1", "beras", 1000, "2024-01-01"),
            record("r2", "beras", 1200, "2024-02-01"),
        ];
        let compared = with_comparisons(&records, &Utc);
        let ids: Vec<&str> = compared.iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert_eq!(
            compared[2].comparison.as_ref().unwrap().previous_price,
            Decimal::from(1200)
        );
    }

    #[test]
    fn test_same_date_keeps_arrival_order() {
        let records = vec![
            record("morning", "gula", 15000, "2024-01-01"),
            record("evening", "gula", 16000, "2024-01-01"),
        ];
        let compared = with_comparisons(&records, &Utc);
        assert_eq!(compared[1].record.id, "evening");
        assert_eq!(
            compared[1].comparison.as_ref().unwrap().delta,
            Decimal::from(1000)
        );
    }

    #[test]
    fn test_flat_price() {
        let comparison = compare(Decimal::from(5000), Decimal::from(5000));
        assert_eq!(comparison.direction, Direction::Flat);
        assert_eq!(comparison.percent, Some(Decimal::ZERO));
        assert_eq!(comparison.delta, Decimal::ZERO);
    }

    #[test]
    fn test_zero_previous_price_gives_undefined_percent() {
        let records = vec![
            record("r1", "bonus", 0, "2024-01-01"),
            record("r2", "bonus", 500, "2024-01-02"),
        ];
        let compared = with_comparisons(&records, &Utc);
        let comparison = compared[1].comparison.as_ref().unwrap();
        assert_eq!(comparison.direction, Direction::Up);
        assert_eq!(comparison.percent, None);
        assert_eq!(comparison.delta, Decimal::from(500));
    }

    #[test]
    fn test_zero_to_zero_is_flat_zero_percent() {
        let comparison = compare(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(comparison.direction, Direction::Flat);
        assert_eq!(comparison.percent, Some(Decimal::ZERO));
    }

    #[test]
    fn test_extreme_prices_do_not_overflow() {
        assert_eq!(round_half_up(Decimal::MAX), None);
        assert_eq!(round_half_up(Decimal::new(125, 1)), Some(Decimal::from(13)));

        let comparison = compare(Decimal::new(1, 28), Decimal::MAX);
        assert_eq!(comparison.percent, None);
        assert_eq!(comparison.direction, Direction::Up);

        let comparison = compare(Decimal::MAX, Decimal::MIN);
        assert_eq!(comparison.delta, Decimal::MIN);
        assert_eq!(comparison.direction, Direction::Down);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // +12.5% rounds up to 13
        assert_eq!(
            compare(Decimal::from(200), Decimal::from(225)).percent,
            Some(Decimal::from(13))
        );
        // -12.5% rounds up to -12
        assert_eq!(
            compare(Decimal::from(200), Decimal::from(175)).percent,
            Some(Decimal::from(-12))
        );
        // 1/3 = 33.33..% rounds to 33
        assert_eq!(
            compare(Decimal::from(3), Decimal::from(4)).percent,
            Some(Decimal::from(33))
        );
        // -2/3 = -66.66..% rounds to -67
        assert_eq!(
            compare(Decimal::from(3), Decimal::from(1)).percent,
            Some(Decimal::from(-67))
        );
    }

    #[test]
    fn test_group_by_product_keeps_first_appearance_order() {
        let records = vec![
            record("r1", "gula", 1, "2024-01-01"),
            record("r2", "beras", 2, "2024-01-01"),
            record("r3", "gula", 3, "2024-01-02"),
        ];
        let groups = group_by_product(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "gula");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "beras");

        let counts = count_by_product(&records);
        assert_eq!(counts["gula"], 2);
        assert_eq!(counts["beras"], 1);
    }

    #[test]
    fn test_fill_comparisons_per_product_and_keeps_server_values() {
        let server = Comparison {
            delta: Decimal::from(7),
            percent: Some(Decimal::from(7)),
            direction: Direction::Up,
            previous_price: Decimal::from(100),
        };
        let mut with_server = record("g2", "gula", 107, "2024-01-02");
        with_server.comparison = Some(server.clone());

        let records = vec![
            record("b1", "beras", 1000, "2024-01-01"),
            record("g1", "gula", 100, "2024-01-01"),
            with_server,
            record("b2", "beras", 1100, "2024-01-03"),
        ];
        let filled = fill_comparisons(&records, &Utc);
        let by_id: HashMap<&str, &ComparedPrice> =
            filled.iter().map(|c| (c.record.id.as_str(), c)).collect();

        assert!(by_id["b1"].comparison.is_none());
        assert!(by_id["g1"].comparison.is_none());
        assert_eq!(by_id["g2"].comparison, Some(server));
        let b2 = by_id["b2"].comparison.as_ref().unwrap();
        assert_eq!(b2.previous_price, Decimal::from(1000));
        assert_eq!(b2.percent, Some(Decimal::from(10)));
    }
}
