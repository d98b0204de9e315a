//! Ordinary least squares with coefficient standard errors.
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Solved through the SVD of the design matrix `X = U Σ Vᵀ`:
//! - `β = V Σ⁻¹ Uᵀ y`
//! - `(XᵀX)⁻¹ = V Σ⁻² Vᵀ`, whose diagonal gives the coefficient variances
//!
//! Rank-deficient designs (e.g. a constant regressor next to the intercept)
//! are reported as `None` rather than producing huge, meaningless t-values.

use nalgebra::{DMatrix, DVector};

/// Singular values below `RANK_TOL × σ_max` count as zero.
const RANK_TOL: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
    /// Number of regressors (including any intercept column).
    pub k: usize,
    pub std_errors: Vec<f64>,
}

impl OlsFit {
    pub fn t_value(&self, j: usize) -> f64 {
        self.beta[j] / self.std_errors[j]
    }

    /// Gaussian log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion (`-2 llf + 2k`).
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k as f64
    }
}

/// Fit `y ~ X`. Returns `None` when the design is rank deficient or has no
/// residual degrees of freedom.
pub fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let (nobs, k) = x.shape();
    if nobs != y.len() || k == 0 || nobs <= k {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let sigma = &svd.singular_values;
    let sigma_max = sigma.iter().cloned().fold(0.0, f64::max);
    if !(sigma_max.is_finite() && sigma_max > 0.0) || sigma.iter().any(|&s| s <= RANK_TOL * sigma_max) {
        return None;
    }

    let beta = svd.solve(y, RANK_TOL * sigma_max).ok()?;
    if beta.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let residuals = y - x * &beta;
    let ssr = residuals.norm_squared();
    let s2 = ssr / (nobs - k) as f64;

    let v_t = svd.v_t.as_ref()?;
    let std_errors = (0..k)
        .map(|j| {
            let diag: f64 = (0..k).map(|i| (v_t[(i, j)] / sigma[i]).powi(2)).sum();
            (s2 * diag).sqrt()
        })
        .collect();

    Some(OlsFit {
        beta,
        ssr,
        nobs,
        k,
        std_errors,
    })
}
