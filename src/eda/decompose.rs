//! Classical additive seasonal decomposition.
//!
//! `observed = trend + seasonal + residual`, where:
//!
//! - trend is a centred moving average over one period (a `2 × period` filter
//!   with half weights at both ends when the period is even)
//! - seasonal is the per-phase mean of the detrended series, shifted to sum to zero
//! - residual is what remains
//!
//! The trend (and therefore the residual) is undefined for the first and last
//! `period / 2` points and is reported as `NaN` there.

use tracing::info;

use crate::context::RunContext;
use crate::domain::{Decomposition, PriceSeries};
use crate::error::AppError;

/// Period used for daily prices (roughly one month of observations).
pub const DEFAULT_PERIOD: usize = 30;

/// Decompose the price series with an additive model.
pub fn seasonal_decomposition(
    series: &PriceSeries,
    period: usize,
    ctx: &RunContext,
) -> Result<Decomposition, AppError> {
    let _stage = ctx.stage("seasonal_decomposition");
    if series.is_empty() {
        return Err(AppError::EmptyData { stage: "seasonal_decomposition" });
    }
    let decomposition = decompose_additive(&series.prices(), period)?;
    info!(period, observations = series.len(), "Seasonal decomposition computed");
    Ok(decomposition)
}

/// Additive decomposition of raw values; needs at least two full periods.
pub fn decompose_additive(values: &[f64], period: usize) -> Result<Decomposition, AppError> {
    if period < 2 {
        return Err(AppError::InvalidInput(format!(
            "Decomposition period must be at least 2, got {period}."
        )));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(AppError::InsufficientData(format!(
            "seasonal decomposition with period {period} needs at least {} observations, got {n}",
            2 * period
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InvalidInput(
            "Seasonal decomposition requires finite values (no missing data).".to_string(),
        ));
    }

    let trend = centred_moving_average(values, period);

    let mut phase_sum = vec![0.0; period];
    let mut phase_count = vec![0usize; period];
    for (i, (&y, &t)) in values.iter().zip(&trend).enumerate() {
        if t.is_finite() {
            phase_sum[i % period] += y - t;
            phase_count[i % period] += 1;
        }
    }
    let mut phase_mean: Vec<f64> = phase_sum
        .iter()
        .zip(&phase_count)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let centre = phase_mean.iter().sum::<f64>() / period as f64;
    for m in &mut phase_mean {
        *m -= centre;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| phase_mean[i % period]).collect();
    let residual: Vec<f64> = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((&y, &t), &s)| y - t - s)
        .collect();

    Ok(Decomposition {
        period,
        observed: values.to_vec(),
        trend,
        seasonal,
        residual,
    })
}

fn centred_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let mut out = vec![f64::NAN; n];
    if n <= 2 * half {
        return out;
    }

    for i in half..n - half {
        let window = &values[i - half..=i + half];
        out[i] = if period % 2 == 0 {
            // period + 1 taps: half weight on both ends.
            let inner: f64 = window[1..window.len() - 1].iter().sum();
            (inner + 0.5 * (window[0] + window[window.len() - 1])) / period as f64
        } else {
            window.iter().sum::<f64>() / period as f64
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let trend = 50.0 + 0.1 * i as f64;
                let phase = (i % period) as f64 / period as f64;
                trend + 3.0 * (2.0 * std::f64::consts::PI * phase).sin()
            })
            .collect()
    }

    #[test]
    fn components_add_back_up() {
        let values = synthetic(240, DEFAULT_PERIOD);
        let dec = decompose_additive(&values, DEFAULT_PERIOD).unwrap();

        assert_eq!(dec.trend.len(), values.len());
        assert!(dec.trend[..15].iter().all(|t| t.is_nan()));
        assert!(dec.trend[225..].iter().all(|t| t.is_nan()));
        assert!(dec.trend[15..225].iter().all(|t| t.is_finite()));

        for i in 15..225 {
            let rebuilt = dec.trend[i] + dec.seasonal[i] + dec.residual[i];
            assert!((rebuilt - values[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn recovers_linear_trend_and_zero_mean_season() {
        let values = synthetic(300, DEFAULT_PERIOD);
        let dec = decompose_additive(&values, DEFAULT_PERIOD).unwrap();

        // A centred average over whole periods removes the sine exactly.
        for i in 15..285 {
            let expected = 50.0 + 0.1 * i as f64;
            assert!((dec.trend[i] - expected).abs() < 1e-9, "trend at {i}");
        }
        let season_sum: f64 = dec.seasonal[..DEFAULT_PERIOD].iter().sum();
        assert!(season_sum.abs() < 1e-9);
        assert!(dec.residual[15..285].iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn odd_period_uses_plain_window() {
        let values: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
        let dec = decompose_additive(&values, 5).unwrap();
        assert_eq!(dec.trend[2], 2.0);
        assert!(dec.trend[1].is_nan());
    }

    #[test]
    fn too_few_points_is_a_clear_error() {
        let err = decompose_additive(&vec![1.0; 59], DEFAULT_PERIOD).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData(_)));
        assert!(err.to_string().contains("at least 60 observations, got 59"));
        assert!(decompose_additive(&vec![1.0; 60], DEFAULT_PERIOD).is_ok());
    }

    #[test]
    fn degenerate_period_is_rejected() {
        assert!(matches!(decompose_additive(&[1.0; 10], 1), Err(AppError::InvalidInput(_))));
    }
}
