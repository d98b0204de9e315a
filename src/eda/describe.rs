//! Descriptive statistics.

use tracing::info;

use crate::context::RunContext;
use crate::domain::{PriceSeries, Summary};
use crate::error::AppError;

/// Count, mean, sample std, min, quartiles and max of the prices, rounded to 2 dp.
pub fn describe_data(series: &PriceSeries, ctx: &RunContext) -> Result<Summary, AppError> {
    let _stage = ctx.stage("describe_data");
    if series.is_empty() {
        return Err(AppError::EmptyData { stage: "describe_data" });
    }
    let summary = describe(&series.prices())?;
    info!(count = summary.count, mean = summary.mean, std = summary.std, "Descriptive statistics computed");
    Ok(summary)
}

/// Summary statistics over raw values.
///
/// Quartiles use linear interpolation between order statistics. The standard
/// deviation uses `n - 1` and is `NaN` for a single value.
pub fn describe(values: &[f64]) -> Result<Summary, AppError> {
    if values.is_empty() {
        return Err(AppError::EmptyData { stage: "describe" });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InvalidInput("Cannot describe non-finite values.".to_string()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n as f64 - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    Ok(Summary {
        count: n,
        mean: round2(mean),
        std: round2(std),
        min: round2(sorted[0]),
        q25: round2(quantile(&sorted, 0.25)),
        median: round2(quantile(&sorted, 0.5)),
        q75: round2(quantile(&sorted, 0.75)),
        max: round2(sorted[n - 1]),
    })
}

/// Linear-interpolation quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
