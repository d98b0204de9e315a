//! Reporting: machine-readable run outputs and terminal formatting.

use serde::Serialize;

use crate::domain::{AdfResult, Summary};
use crate::models::BaselineScore;

pub mod format;

pub use format::*;

/// `brent eda --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub summary: Summary,
    pub period: usize,
    /// `false` when the series is shorter than two periods.
    pub decomposed: bool,
    pub acf: Option<Vec<f64>>,
    pub pacf: Option<Vec<f64>>,
}

/// `brent model --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub train_size: usize,
    pub test_size: usize,
    /// ADF on train prices.
    pub adf_levels: AdfResult,
    /// ADF on first differences of train prices.
    pub adf_differences: AdfResult,
    pub baselines: Vec<BaselineScore>,
}
