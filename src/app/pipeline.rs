//! Shared pipeline logic behind the CLI subcommands.
//!
//! Keeping the workflows here lets the binary focus on presentation:
//!
//! - fetch: World Bank -> indicator table -> CSV
//! - eda: price CSV -> series -> summary / charts / decomposition / ACF
//! - model: series -> split -> ADF (levels, differences) -> baselines
//! - merge: prices + indicators -> daily as-of join -> merged CSV

use std::path::{Path, PathBuf};

use chrono::Datelike;

use tracing::{error, warn};

use crate::config::Settings;
use crate::context::RunContext;
use crate::data::{WorldBankClient, merge_datasets, resample_daily};
use crate::domain::{
    DateRange, Decomposition, IndicatorTable, MergedDataset, PriceSeries, Summary, default_indicators,
};
use crate::eda::{
    PlotOptions, acf, default_nlags, describe_data, format_date, pacf, plot_decomposition, plot_time_series,
    seasonal_decomposition,
};
use crate::error::AppError;
use crate::io::{load_prices, read_indicator_csv, write_indicator_csv, write_merged_csv};
use crate::models::{adf_test, evaluate_baselines, split_data};
use crate::report::ModelReport;

/// Fetch the default indicators for `range` and write them to `output`.
pub fn run_fetch(settings: &Settings, range: DateRange, output: &Path, ctx: &RunContext) -> Result<IndicatorTable, AppError> {
    let client = WorldBankClient::from_settings(settings);
    let table = client.fetch_indicators(&default_indicators(), range, ctx)?;
    write_indicator_csv(output, &table)?;
    Ok(table)
}

/// Load a price CSV and normalise it into a date-indexed series.
pub fn load_series(prices: &Path, ctx: &RunContext) -> Result<PriceSeries, AppError> {
    let raw = load_prices(prices, ctx)?;
    format_date(&raw, ctx)
}

#[derive(Debug, Clone)]
pub struct EdaConfig {
    pub period: usize,
    pub nlags: Option<usize>,
    /// Terminal chart size; `None` skips the charts.
    pub chart: Option<(usize, usize)>,
    /// Directory for `price.svg` / `decomposition.svg`.
    pub plot_dir: Option<PathBuf>,
}

/// EDA results. Steps that need more data than the series holds are `None`.
#[derive(Debug, Clone)]
pub struct EdaOutput {
    pub summary: Summary,
    pub decomposition: Option<Decomposition>,
    pub acf: Option<Vec<f64>>,
    pub pacf: Option<Vec<f64>>,
    pub price_chart: Option<String>,
    pub decomposition_chart: Option<String>,
}

/// Run the EDA steps independently: a series too short for one step still
/// gets the others.
pub fn run_eda(series: &PriceSeries, config: &EdaConfig, ctx: &RunContext) -> Result<EdaOutput, AppError> {
    let summary = describe_data(series, ctx)?;
    let decomposition = skip_insufficient("seasonal_decomposition", seasonal_decomposition(series, config.period, ctx))?;

    let prices = series.prices();
    let nlags = config.nlags.unwrap_or_else(|| default_nlags(prices.len()));
    let acf = skip_insufficient("acf", acf(&prices, nlags))?;
    let pacf = match acf {
        Some(_) => Some(pacf(&prices, nlags)?),
        None => None,
    };

    let mut price_chart = None;
    let mut decomposition_chart = None;
    if config.chart.is_some() || config.plot_dir.is_some() {
        let (width, height) = config.chart.unwrap_or((80, 20));
        let svg_path = |name: &str| config.plot_dir.as_ref().map(|dir| dir.join(name));

        let price_opts = PlotOptions { width, height, svg: svg_path("price.svg") };
        let text = plot_time_series(series, &price_opts, ctx)?;
        price_chart = config.chart.map(|_| text);

        if let Some(decomposition) = &decomposition {
            let panel_opts = PlotOptions {
                width,
                height: (height / 2).max(5),
                svg: svg_path("decomposition.svg"),
            };
            let text = plot_decomposition(series, decomposition, &panel_opts, ctx)?;
            decomposition_chart = config.chart.map(|_| text);
        }
    }

    Ok(EdaOutput {
        summary,
        decomposition,
        acf,
        pacf,
        price_chart,
        decomposition_chart,
    })
}

fn skip_insufficient<T>(step: &str, result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::InsufficientData(reason)) => {
            warn!(step, %reason, "Skipping EDA step");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Split, test stationarity on the train partition, and score the baselines.
pub fn run_model(series: &PriceSeries, train_size: f64, ctx: &RunContext) -> Result<ModelReport, AppError> {
    let prices = series.prices();
    let (train, test) = split_data(&prices, train_size, ctx)?;
    if train.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "train_size {train_size} leaves no training observations out of {}",
            prices.len()
        )));
    }

    let adf_levels = adf_test(train, ctx)?;
    let returns: Vec<f64> = train.windows(2).map(|w| w[1] - w[0]).collect();
    let adf_differences = adf_test(&returns, ctx)?;
    let baselines = evaluate_baselines(train, test, ctx)?;

    Ok(ModelReport {
        train_size: train.len(),
        test_size: test.len(),
        adf_levels,
        adf_differences,
        baselines,
    })
}

/// Where the indicators for a merge come from.
#[derive(Debug, Clone)]
pub enum IndicatorSource {
    /// A CSV written by `run_fetch`.
    File(PathBuf),
    /// A fresh fetch from 1 January of the first price year to the last price.
    Fetch(Settings),
}

/// Merge prices with daily indicators and write the merged CSV.
///
/// A failed fetch or an empty indicator table is logged and the merge goes on
/// with prices only.
pub fn run_merge(prices: &Path, source: &IndicatorSource, output: &Path, ctx: &RunContext) -> Result<MergedDataset, AppError> {
    let series = load_series(prices, ctx)?;

    let table = match source {
        IndicatorSource::File(path) => Some(read_indicator_csv(path)?),
        IndicatorSource::Fetch(settings) => {
            let (first, last) = match (series.points().first(), series.points().last()) {
                (Some(first), Some(last)) => (first.date, last.date),
                _ => return Err(AppError::EmptyData { stage: "run_merge" }),
            };
            // Annual observations are dated 1 January; start there so the
            // first price year keeps its indicators.
            let range = DateRange::new(first.with_ordinal(1).unwrap_or(first), last)?;
            match WorldBankClient::from_settings(settings).fetch_indicators(&default_indicators(), range, ctx) {
                Ok(table) => Some(table),
                Err(err) => {
                    error!(error = %err, "Indicator fetch failed; continuing without indicators");
                    None
                }
            }
        }
    };

    let daily = match table.as_ref().map(|t| resample_daily(t, ctx)) {
        Some(Ok(daily)) => Some(daily),
        Some(Err(AppError::EmptyData { .. })) => {
            warn!("Indicator table is empty; skipping resampling");
            None
        }
        Some(Err(err)) => return Err(err),
        None => None,
    };

    let merged = merge_datasets(&series, daily.as_ref(), ctx)?;
    write_merged_csv(output, &merged)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IndicatorRow, PricePoint};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    fn write(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    fn synthetic_series(n: usize) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let points = (0..n)
            .map(|i| {
                let seasonal = 3.0 * (i as f64 / 30.0 * std::f64::consts::TAU).sin();
                PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    price: 50.0 + 0.05 * i as f64 + seasonal + noise.sample(&mut rng),
                }
            })
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn eda_produces_every_result() {
        let series = synthetic_series(120);
        let config = EdaConfig { period: 30, nlags: Some(10), chart: Some((40, 10)), plot_dir: None };
        let out = run_eda(&series, &config, &RunContext::default()).unwrap();

        assert_eq!(out.summary.count, 120);
        assert_eq!(out.decomposition.unwrap().period, 30);
        assert_eq!(out.acf.unwrap().len(), 11);
        assert_eq!(out.pacf.unwrap().len(), 11);
        assert!(out.price_chart.is_some());
        assert!(out.decomposition_chart.is_some());
    }

    #[test]
    fn short_series_still_gets_summary_and_chart() {
        let series = synthetic_series(40);
        let config = EdaConfig { period: 30, nlags: None, chart: Some((40, 10)), plot_dir: None };
        let out = run_eda(&series, &config, &RunContext::default()).unwrap();

        assert_eq!(out.summary.count, 40);
        assert!(out.price_chart.is_some());
        assert!(out.decomposition.is_none());
        assert!(out.decomposition_chart.is_none());
        assert!(out.acf.is_some());
    }

    #[test]
    fn single_price_skips_every_correlation_step() {
        let series = synthetic_series(1);
        let config = EdaConfig { period: 30, nlags: None, chart: None, plot_dir: None };
        let out = run_eda(&series, &config, &RunContext::default()).unwrap();
        assert_eq!(out.summary.count, 1);
        assert!(out.acf.is_none());
        assert!(out.pacf.is_none());
    }

    #[test]
    fn model_report_partitions_series() {
        let series = synthetic_series(200);
        let report = run_model(&series, 0.8, &RunContext::default()).unwrap();
        assert_eq!(report.train_size, 160);
        assert_eq!(report.test_size, 40);
        assert_eq!(report.baselines.len(), 2);
    }

    #[test]
    fn merge_from_indicator_file() {
        let dir = tempfile::tempdir().unwrap();
        let prices = dir.path().join("prices.csv");
        write(&prices, "Date,Price\n02-Jan-20,66.25\n01-Jan-20,65.0\n03-Jan-20,67.5\n");

        let indicators = dir.path().join("world_data.csv");
        let table = IndicatorTable {
            labels: vec!["Inflation Rate (%)".to_string()],
            rows: vec![
                IndicatorRow { country: "World".to_string(), date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), values: vec![Some(2.2)] },
                IndicatorRow { country: "World".to_string(), date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), values: vec![Some(1.9)] },
            ],
        };
        write_indicator_csv(&indicators, &table).unwrap();

        let output = dir.path().join("out/merged_data.csv");
        let merged = run_merge(&prices, &IndicatorSource::File(indicators), &output, &RunContext::default()).unwrap();

        let values: Vec<Option<f64>> = merged.rows.iter().map(|r| r.values[0]).collect();
        assert_eq!(values, vec![Some(2.2), Some(1.9), Some(1.9)]);

        let records = crate::io::load_records(&output).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["Date"], "2020-01-01");
        assert_eq!(records[0]["Inflation Rate (%)"], 2.2);
    }

    #[test]
    fn fetched_indicators_cover_the_first_price_year() {
        let dir = tempfile::tempdir().unwrap();
        let prices = dir.path().join("prices.csv");
        write(&prices, "Date,Price\n2020-03-02,50.0\n2020-03-03,51.0\n2021-02-01,52.0\n");

        let body = serde_json::json!([
            {"page": 1, "pages": 1, "per_page": 1000, "total": 2},
            [
                {"country": {"id": "1W", "value": "World"}, "date": "2021", "value": 5.0},
                {"country": {"id": "1W", "value": "World"}, "date": "2020", "value": 2.0}
            ]
        ]);
        let url = crate::data::worldbank::spawn_provider(200, body);
        let settings = Settings::from_lookup(|key| match key {
            "WORLD_BANK_API_URL" => Some(url.clone()),
            _ => None,
        })
        .unwrap();

        let output = dir.path().join("merged.csv");
        let merged = run_merge(&prices, &IndicatorSource::Fetch(settings), &output, &RunContext::default()).unwrap();

        assert_eq!(merged.labels.len(), 4);
        let values: Vec<Option<f64>> = merged.rows.iter().map(|r| r.values[0]).collect();
        assert_eq!(values, vec![Some(2.0), Some(2.0), Some(5.0)]);
    }

    #[test]
    fn failed_fetch_merges_prices_only() {
        let dir = tempfile::tempdir().unwrap();
        let prices = dir.path().join("prices.csv");
        write(&prices, "Date,Price\n2020-01-01,65.0\n2020-01-02,66.0\n");

        // Nothing listens on port 9 locally; the request fails fast.
        let settings = Settings::from_lookup(|key| match key {
            "WORLD_BANK_API_URL" => Some("http://127.0.0.1:9".to_string()),
            _ => None,
        })
        .unwrap();
        let output = dir.path().join("merged.csv");
        let merged = run_merge(&prices, &IndicatorSource::Fetch(settings), &output, &RunContext::default()).unwrap();
        assert!(merged.labels.is_empty());
        assert_eq!(merged.rows.len(), 2);
    }
}
