//! Baseline forecasts scored on the held-out partition.
//!
//! Two baselines give the later modelling work a floor to beat:
//!
//! - `LinearTrend`: `price ≈ a + b·t` fitted by OLS on the train index
//! - naive: repeat the last train value

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::info;

use crate::context::RunContext;
use crate::domain::ForecastMetrics;
use crate::error::AppError;
use crate::math::ols;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    /// Train length; forecasts continue the index from here.
    pub n_train: usize,
}

impl LinearTrend {
    pub fn fit(train: &[f64]) -> Result<Self, AppError> {
        if train.len() < 3 {
            return Err(AppError::InsufficientData(format!(
                "linear trend needs at least 3 training points, got {}",
                train.len()
            )));
        }
        let n = train.len();
        let mut data = Vec::with_capacity(n * 2);
        for t in 0..n {
            data.push(1.0);
            data.push(t as f64);
        }
        let x = DMatrix::from_row_slice(n, 2, &data);
        let y = DVector::from_row_slice(train);
        let fit = ols(&x, &y).ok_or_else(|| AppError::Numerical("linear trend fit failed".to_string()))?;

        Ok(Self {
            intercept: fit.beta[0],
            slope: fit.beta[1],
            n_train: n,
        })
    }

    pub fn predict(&self, horizon: usize) -> Vec<f64> {
        (self.n_train..self.n_train + horizon)
            .map(|t| self.intercept + self.slope * t as f64)
            .collect()
    }
}

pub fn naive_forecast(train: &[f64], horizon: usize) -> Result<Vec<f64>, AppError> {
    let last = train.last().ok_or(AppError::EmptyData { stage: "naive_forecast" })?;
    Ok(vec![*last; horizon])
}

/// RMSE, MAE and R² of `predicted` against `actual`.
///
/// R² follows the usual convention for a constant `actual`: 1 for a perfect
/// prediction, 0 otherwise.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<ForecastMetrics, AppError> {
    if actual.len() != predicted.len() {
        return Err(AppError::InvalidInput(format!(
            "length mismatch: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(AppError::EmptyData { stage: "evaluate" });
    }

    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let mut ss_res = 0.0;
    let mut abs_err = 0.0;
    let mut ss_tot = 0.0;
    for (a, p) in actual.iter().zip(predicted) {
        ss_res += (a - p).powi(2);
        abs_err += (a - p).abs();
        ss_tot += (a - mean).powi(2);
    }

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(ForecastMetrics {
        rmse: (ss_res / n).sqrt(),
        mae: abs_err / n,
        r2,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineScore {
    pub name: &'static str,
    pub metrics: ForecastMetrics,
}

/// Fit both baselines on `train` and score them on `test`.
pub fn evaluate_baselines(train: &[f64], test: &[f64], ctx: &RunContext) -> Result<Vec<BaselineScore>, AppError> {
    let _stage = ctx.stage("evaluate_baselines");
    let horizon = test.len();

    let trend = LinearTrend::fit(train)?;
    let scores = vec![
        BaselineScore {
            name: "linear_trend",
            metrics: evaluate(test, &trend.predict(horizon))?,
        },
        BaselineScore {
            name: "naive",
            metrics: evaluate(test, &naive_forecast(train, horizon)?)?,
        },
    ];
    for s in &scores {
        info!(model = s.name, rmse = s.metrics.rmse, mae = s.metrics.mae, r2 = s.metrics.r2, "Baseline scored");
    }
    Ok(scores)
}
