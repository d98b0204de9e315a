//! Date normalization for raw price tables.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::context::RunContext;
use crate::domain::{PricePoint, PriceSeries, RawPriceTable};
use crate::error::AppError;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date cell, returning `None` for anything unrecognised.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse dates with coercion and build a strictly increasing date-indexed series.
///
/// Rows whose date cannot be parsed are dropped (and counted in the log).
/// Rows are stably sorted by date and only the first row of each date is kept.
/// Applying this to its own output (`to_raw`) is a no-op.
pub fn format_date(table: &RawPriceTable, ctx: &RunContext) -> Result<PriceSeries, AppError> {
    let _stage = ctx.stage("format_date");
    if table.is_empty() {
        return Err(AppError::EmptyData { stage: "format_date" });
    }

    let mut points: Vec<PricePoint> = table
        .rows
        .iter()
        .filter_map(|row| parse_date(&row.date).map(|date| PricePoint { date, price: row.price }))
        .collect();

    let dropped = table.len() - points.len();
    if dropped > 0 {
        warn!(dropped, "Dropped rows with unparseable dates");
    }

    points.sort_by_key(|p| p.date);
    let before_dedup = points.len();
    points.dedup_by_key(|p| p.date);
    let duplicates = before_dedup - points.len();
    if duplicates > 0 {
        warn!(duplicates, "Dropped rows with duplicate dates");
    }

    if points.is_empty() {
        warn!("No rows left after date normalization");
    } else {
        info!(
            rows = points.len(),
            first = %points[0].date,
            last = %points[points.len() - 1].date,
            "Date column normalized"
        );
    }

    PriceSeries::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawPriceRow;

    fn raw(rows: &[(&str, f64)]) -> RawPriceTable {
        RawPriceTable {
            rows: rows
                .iter()
                .map(|&(date, price)| RawPriceRow { date: date.to_string(), price })
                .collect(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_brent_export_layouts() {
        assert_eq!(parse_date("20-May-87"), Some(d(1987, 5, 20)));
        assert_eq!(parse_date("Apr 22, 2020"), Some(d(2020, 4, 22)));
        assert_eq!(parse_date("2020-04-22"), Some(d(2020, 4, 22)));
        assert_eq!(parse_date("04/22/2020"), Some(d(2020, 4, 22)));
        assert_eq!(parse_date("2020-04-22 00:00:00"), Some(d(2020, 4, 22)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn drops_bad_dates_and_sorts() {
        let table = raw(&[("22-May-87", 18.55), ("garbage", 1.0), ("20-May-87", 18.63), ("21-May-87", 18.45)]);
        let series = format_date(&table, &RunContext::default()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.dates(), vec![d(1987, 5, 20), d(1987, 5, 21), d(1987, 5, 22)]);
        assert_eq!(series.prices(), vec![18.63, 18.45, 18.55]);
    }

    #[test]
    fn duplicate_dates_keep_first_row() {
        let table = raw(&[("2020-01-02", 2.0), ("2020-01-01", 1.0), ("Jan 02, 2020", 99.0)]);
        let series = format_date(&table, &RunContext::default()).unwrap();
        assert_eq!(series.prices(), vec![1.0, 2.0]);
        assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn format_date_is_idempotent() {
        let ctx = RunContext::default();
        let table = raw(&[("Apr 22, 2020", 13.77), ("20-May-87", 18.63), ("bad", 0.0), ("20-May-87", 1.0)]);
        let once = format_date(&table, &ctx).unwrap();
        let twice = format_date(&once.to_raw(), &ctx).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_table_is_an_explicit_error() {
        let err = format_date(&RawPriceTable::default(), &RunContext::default()).unwrap_err();
        assert!(matches!(err, AppError::EmptyData { .. }));
    }
}
