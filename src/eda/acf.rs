//! Sample autocorrelation and partial autocorrelation.

use crate::error::AppError;

/// Default lag count: `min(10·log10(n), n - 1)`.
pub fn default_nlags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    ((10.0 * (n as f64).log10()) as usize).min(n - 1)
}

/// Autocorrelation for lags `0..=nlags` (biased autocovariance, lag 0 = 1).
pub fn acf(values: &[f64], nlags: usize) -> Result<Vec<f64>, AppError> {
    let n = values.len();
    if n < 2 {
        return Err(AppError::InsufficientData(format!(
            "autocorrelation needs at least 2 observations, got {n}"
        )));
    }
    let nlags = nlags.min(n - 1);

    let mean = values.iter().sum::<f64>() / n as f64;
    let centred: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let acov = |lag: usize| -> f64 {
        centred[lag..]
            .iter()
            .zip(&centred[..n - lag])
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / n as f64
    };

    let c0 = acov(0);
    if !(c0.is_finite() && c0 > 0.0) {
        return Err(AppError::Numerical(
            "autocorrelation is undefined for a constant series".to_string(),
        ));
    }

    Ok((0..=nlags).map(|lag| acov(lag) / c0).collect())
}

/// Partial autocorrelation for lags `0..=nlags`, capped below `n / 2`.
///
/// Yule-Walker estimates from the sample ACF, solved with the Durbin-Levinson
/// recursion.
pub fn pacf(values: &[f64], nlags: usize) -> Result<Vec<f64>, AppError> {
    let nlags = nlags.min((values.len() / 2).saturating_sub(1));
    let r = acf(values, nlags)?;
    durbin_levinson(&r)
}

/// Partial autocorrelations from an autocorrelation sequence starting at lag 0.
pub fn durbin_levinson(r: &[f64]) -> Result<Vec<f64>, AppError> {
    let mut out = Vec::with_capacity(r.len());
    if r.is_empty() {
        return Ok(out);
    }
    out.push(1.0);

    // phi[j - 1] holds phi_{k,j} for the current order k.
    let mut phi: Vec<f64> = Vec::with_capacity(r.len());
    for k in 1..r.len() {
        let num = r[k] - (1..k).map(|j| phi[j - 1] * r[k - j]).sum::<f64>();
        let den = 1.0 - (1..k).map(|j| phi[j - 1] * r[j]).sum::<f64>();
        let phi_kk = num / den;
        if !phi_kk.is_finite() {
            return Err(AppError::Numerical(format!(
                "partial autocorrelation is undefined at lag {k}"
            )));
        }

        let prev = phi.clone();
        for j in 1..k {
            phi[j - 1] = prev[j - 1] - phi_kk * prev[k - j - 1];
        }
        phi.push(phi_kk);
        out.push(phi_kk);
    }
    Ok(out)
}
