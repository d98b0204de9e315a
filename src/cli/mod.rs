//! Command-line parsing for the Brent oil price analysis tool.
//!
//! Argument parsing and command dispatch stay separate from the analysis code;
//! `app` turns these structs into pipeline options.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::eda::DEFAULT_PERIOD;
use crate::models::DEFAULT_TRAIN_SIZE;

pub const DEFAULT_INDICATOR_PATH: &str = "../data/world_data.csv";
pub const DEFAULT_MERGED_PATH: &str = "../../data/merged_data.csv";
pub const DEFAULT_PRICES_PATH: &str = "../data/BrentOilPrices.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "brent", version, about = "Brent oil price analysis: indicators, EDA, models, serving")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch World Bank indicators for the world aggregate and write them to CSV.
    Fetch(FetchArgs),
    /// Exploratory analysis of the price history: summary, chart, decomposition, ACF.
    Eda(EdaArgs),
    /// Train/test split, ADF stationarity tests and forecast baselines.
    Model(ModelArgs),
    /// Join daily prices with forward-filled indicators and write the merged CSV.
    Merge(MergeArgs),
    /// Serve the merged dataset over HTTP.
    Serve(ServeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// First date of the requested range (YYYY-MM-DD).
    #[arg(long, default_value = "1986-05-20")]
    pub start: NaiveDate,

    /// Last date of the requested range (YYYY-MM-DD).
    #[arg(long, default_value = "2024-09-30")]
    pub end: NaiveDate,

    /// Output CSV (overwritten).
    #[arg(long, default_value = DEFAULT_INDICATOR_PATH)]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct EdaArgs {
    /// Price CSV with `Date` and `Price` columns.
    #[arg(long, default_value = DEFAULT_PRICES_PATH)]
    pub prices: PathBuf,

    /// Seasonal decomposition period (observations).
    #[arg(long, default_value_t = DEFAULT_PERIOD)]
    pub period: usize,

    /// Highest autocorrelation lag; defaults to `min(10·log10(n), n - 1)`.
    #[arg(long)]
    pub nlags: Option<usize>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows; per panel for the decomposition).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Skip the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Also write `price.svg` and `decomposition.svg` into this directory.
    #[arg(long, value_name = "DIR")]
    pub plot_dir: Option<PathBuf>,

    /// Print the results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Price CSV with `Date` and `Price` columns.
    #[arg(long, default_value = DEFAULT_PRICES_PATH)]
    pub prices: PathBuf,

    /// Fraction of the series used for training, in (0, 1).
    #[arg(long, default_value_t = DEFAULT_TRAIN_SIZE)]
    pub train_size: f64,

    /// Print the results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct MergeArgs {
    /// Price CSV with `Date` and `Price` columns.
    #[arg(long, default_value = DEFAULT_PRICES_PATH)]
    pub prices: PathBuf,

    /// Indicator CSV written by `brent fetch`.
    #[arg(long, default_value = DEFAULT_INDICATOR_PATH)]
    pub indicators: PathBuf,

    /// Fetch indicators over the price history instead of reading `--indicators`.
    #[arg(long)]
    pub fetch: bool,

    /// Merged CSV (overwritten).
    #[arg(long, default_value = DEFAULT_MERGED_PATH)]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Merged CSV to serve.
    #[arg(long, default_value = DEFAULT_MERGED_PATH)]
    pub data: PathBuf,

    /// Listen address; overrides `BRENT_SERVER_ADDR`.
    #[arg(long)]
    pub addr: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_constants() {
        let cli = Cli::try_parse_from(["brent", "eda"]).unwrap();
        let Command::Eda(args) = cli.command else {
            panic!("expected eda");
        };
        assert_eq!(args.period, 30);
        assert_eq!(args.prices, PathBuf::from(DEFAULT_PRICES_PATH));
        assert!(!args.json);

        let cli = Cli::try_parse_from(["brent", "model", "--train-size", "0.7"]).unwrap();
        let Command::Model(args) = cli.command else {
            panic!("expected model");
        };
        assert_eq!(args.train_size, 0.7);
    }

    #[test]
    fn fetch_parses_dates_and_serve_parses_addr() {
        let cli = Cli::try_parse_from(["brent", "fetch", "--start", "2000-01-01"]).unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(args.output, PathBuf::from(DEFAULT_INDICATOR_PATH));

        let cli = Cli::try_parse_from(["brent", "serve", "--addr", "0.0.0.0:8080"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.addr, Some("0.0.0.0:8080".parse().unwrap()));
        assert!(Cli::try_parse_from(["brent", "fetch", "--start", "yesterday"]).is_err());
    }
}
