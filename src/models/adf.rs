//! Augmented Dickey-Fuller unit-root test (constant, no trend).
//!
//! Regression, for lag order `p`:
//!
//! ```text
//! Δy_t = α + γ·y_{t-1} + Σ_{i=1..p} δ_i·Δy_{t-i} + ε_t
//! ```
//!
//! The statistic is the t-value of `γ`. The lag order is chosen by minimum AIC
//! over `0..=maxlag`, all candidates fitted on the same sample (trimmed by
//! `maxlag`); the chosen order is then refitted on every usable observation.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

use crate::context::RunContext;
use crate::domain::AdfResult;
use crate::error::AppError;
use crate::math::{OlsFit, mackinnon_critical_values, mackinnon_p_value, ols};

/// Deterministic terms in the regression (the constant).
const N_TREND: usize = 1;

/// Run the ADF test with the default lag search.
pub fn adf_test(values: &[f64], ctx: &RunContext) -> Result<AdfResult, AppError> {
    let _stage = ctx.stage("adf_test");
    let result = adf_test_with(values, None)?;
    info!(
        statistic = result.statistic,
        p_value = result.p_value,
        used_lag = result.used_lag,
        "ADF test computed"
    );
    Ok(result)
}

/// ADF test with an explicit upper bound on the lag search.
pub fn adf_test_with(values: &[f64], max_lag: Option<usize>) -> Result<AdfResult, AppError> {
    if values.is_empty() {
        return Err(AppError::EmptyData { stage: "adf_test" });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InvalidInput("ADF test requires finite values.".to_string()));
    }

    let nobs = values.len();
    let cap = (nobs / 2) as i64 - N_TREND as i64 - 1;
    if cap < 0 {
        return Err(AppError::InsufficientData(format!(
            "ADF test needs at least 4 observations, got {nobs}"
        )));
    }
    let default_lag = (12.0 * (nobs as f64 / 100.0).powf(0.25)).ceil() as i64;
    let maxlag = match max_lag {
        Some(lag) if lag as i64 > cap => {
            return Err(AppError::InvalidInput(format!(
                "max_lag must be at most {cap} for {nobs} observations, got {lag}"
            )));
        }
        Some(lag) => lag,
        None => default_lag.min(cap) as usize,
    };

    let diff: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    // Lag selection on the common sample starting at `maxlag`.
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=maxlag {
        let fit = fit_adf_regression(values, &diff, lag, maxlag)?;
        let aic = fit.aic();
        debug!(lag, aic, "ADF lag candidate");
        if best.is_none_or(|(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let (ic_best, used_lag) = best.ok_or_else(|| AppError::Numerical("ADF lag search produced no fit".to_string()))?;

    let fit = fit_adf_regression(values, &diff, used_lag, used_lag)?;
    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(AppError::Numerical(
            "ADF statistic is not finite (perfectly fitted regression)".to_string(),
        ));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        n_obs: fit.nobs,
        critical_values: mackinnon_critical_values(fit.nobs),
        ic_best,
    })
}

/// Fit `[1, y_{t-1}, Δy_{t-1}..Δy_{t-lag}]` on rows `t = start..diff.len()`.
fn fit_adf_regression(values: &[f64], diff: &[f64], lag: usize, start: usize) -> Result<OlsFit, AppError> {
    let rows = diff.len().saturating_sub(start);
    let k = 2 + lag;
    if rows <= k {
        return Err(AppError::InsufficientData(format!(
            "ADF regression with {lag} lags has {rows} observations for {k} parameters"
        )));
    }

    let mut x = Vec::with_capacity(rows * k);
    let mut y = Vec::with_capacity(rows);
    for t in start..diff.len() {
        x.push(1.0);
        x.push(values[t]);
        for i in 1..=lag {
            x.push(diff[t - i]);
        }
        y.push(diff[t]);
    }

    let x = DMatrix::from_row_slice(rows, k, &x);
    let y = DVector::from_vec(y);
    ols(&x, &y).ok_or_else(|| {
        AppError::Numerical("ADF regression is singular (constant or degenerate series)".to_string())
    })
}
