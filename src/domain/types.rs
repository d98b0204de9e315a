//! Shared domain types.
//!
//! Every pipeline stage takes one of these by reference and returns a new one.
//! Nothing here is mutated after construction by a later stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The World Bank "world" aggregate entity.
pub const WORLD_ENTITY: &str = "WLD";

/// A macroeconomic indicator: opaque provider code + display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub code: String,
    pub label: String,
}

impl Indicator {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Indicators fetched by default.
pub fn default_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new("NY.GDP.MKTP.KD.ZG", "GDP Growth (%)"),
        Indicator::new("FP.CPI.TOTL.ZG", "Inflation Rate (%)"),
        Indicator::new("SL.UEM.TOTL.ZS", "Unemployment Rate (%)"),
        Indicator::new("PA.NUS.FCRF", "Exchange Rate (USD)"),
    ]
}

/// Closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::InvalidInput(format!(
                "Date range end {end} is before start {start}."
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    /// Span of the Brent daily price history.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1986, 5, 20).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// One `(country, date)` observation row with one value per indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub country: String,
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Indicator observations as fetched: one column per label, rows ascending by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorTable {
    pub labels: Vec<String>,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// One calendar day of indicator values.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Indicator values at daily frequency (consecutive days, no gaps).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyIndicators {
    pub labels: Vec<String>,
    pub rows: Vec<DailyRow>,
}

impl DailyIndicators {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for the most recent day on or before `date`, if any.
    pub fn as_of(&self, date: NaiveDate) -> Option<&DailyRow> {
        let idx = self.rows.partition_point(|r| r.date <= date);
        idx.checked_sub(1).map(|i| &self.rows[i])
    }
}

/// A price row exactly as read from the CSV; the date is not parsed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPriceRow {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPriceTable {
    pub rows: Vec<RawPriceRow>,
}

impl RawPriceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Daily price series indexed by a strictly increasing date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build from points, rejecting any input whose dates are not strictly increasing.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AppError> {
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AppError::InvalidInput(format!(
                "Price dates must be strictly increasing ({} then {}).",
                w[0].date, w[1].date
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Render back to a raw table with ISO dates.
    pub fn to_raw(&self) -> RawPriceTable {
        RawPriceTable {
            rows: self
                .points
                .iter()
                .map(|p| RawPriceRow {
                    date: p.date.format("%Y-%m-%d").to_string(),
                    price: p.price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub price: f64,
    pub values: Vec<Option<f64>>,
}

/// Daily prices joined with forward-filled indicator values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedDataset {
    pub labels: Vec<String>,
    pub rows: Vec<MergedRow>,
}

/// Descriptive statistics, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Additive decomposition `observed = trend + seasonal + residual`.
///
/// `trend` and `residual` are `NaN` for the first and last `period / 2` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub period: usize,
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    #[serde(rename = "1%")]
    pub one: f64,
    #[serde(rename = "5%")]
    pub five: f64,
    #[serde(rename = "10%")]
    pub ten: f64,
}

/// Augmented Dickey-Fuller test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    #[serde(rename = "ADF Statistic")]
    pub statistic: f64,
    #[serde(rename = "p-value")]
    pub p_value: f64,
    pub used_lag: usize,
    pub n_obs: usize,
    pub critical_values: CriticalValues,
    /// AIC of the selected lag length.
    pub ic_best: f64,
}

impl AdfResult {
    /// Unit root rejected at the 5% level.
    pub fn is_stationary(&self) -> bool {
        self.p_value < 0.05
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_range_is_closed() {
        let range = DateRange::new(d(2000, 1, 1), d(2000, 12, 31)).unwrap();
        assert!(range.contains(d(2000, 1, 1)));
        assert!(range.contains(d(2000, 12, 31)));
        assert!(!range.contains(d(2001, 1, 1)));
        assert!(DateRange::new(d(2001, 1, 1), d(2000, 1, 1)).is_err());
    }

    #[test]
    fn price_series_rejects_duplicate_dates() {
        let points = vec![
            PricePoint { date: d(2020, 1, 1), price: 1.0 },
            PricePoint { date: d(2020, 1, 1), price: 2.0 },
        ];
        assert!(PriceSeries::new(points).is_err());
    }

    #[test]
    fn as_of_picks_latest_row_not_after_date() {
        let daily = DailyIndicators {
            labels: vec!["x".to_string()],
            rows: vec![
                DailyRow { date: d(2020, 1, 1), values: vec![Some(1.0)] },
                DailyRow { date: d(2020, 1, 2), values: vec![Some(2.0)] },
            ],
        };
        assert!(daily.as_of(d(2019, 12, 31)).is_none());
        assert_eq!(daily.as_of(d(2020, 1, 2)).unwrap().values, vec![Some(2.0)]);
        assert_eq!(daily.as_of(d(2020, 3, 1)).unwrap().values, vec![Some(2.0)]);
    }
}
