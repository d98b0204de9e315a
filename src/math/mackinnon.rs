//! MacKinnon approximations for the Dickey-Fuller τ distribution.
//!
//! Only the "constant, no trend" case with a single series is needed here.
//!
//! - p-values: MacKinnon (1994) response-surface polynomials in τ, mapped
//!   through the standard normal CDF
//! - critical values: MacKinnon (2010) finite-sample surfaces in `1/nobs`

use statrs::distribution::{ContinuousCDF, Normal};

use crate::domain::CriticalValues;

/// Above this τ the p-value is 1.
const TAU_MAX: f64 = 2.74;
/// Below this τ the p-value is 0.
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials.
const TAU_STAR: f64 = -1.61;

const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Approximate p-value for an ADF statistic (regression with constant).
pub fn mackinnon_p_value(tau: f64) -> f64 {
    if tau.is_nan() {
        return f64::NAN;
    }
    if tau > TAU_MAX {
        return 1.0;
    }
    if tau < TAU_MIN {
        return 0.0;
    }
    let z = if tau <= TAU_STAR {
        polyval(&SMALL_P, tau)
    } else {
        polyval(&LARGE_P, tau)
    };
    standard_normal_cdf(z)
}

/// 1%, 5% and 10% critical values for `nobs` regression observations.
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs.max(1) as f64;
    CriticalValues {
        one: polyval(&CRIT_1, inv),
        five: polyval(&CRIT_5, inv),
        ten: polyval(&CRIT_10, inv),
    }
}

/// `c[0] + c[1]·x + c[2]·x² + ...`
fn polyval(coef: &[f64], x: f64) -> f64 {
    coef.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

fn standard_normal_cdf(z: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(n) => n.cdf(z),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_percent_critical_value_maps_to_five_percent() {
        let p = mackinnon_p_value(-2.8623);
        assert!((p - 0.05).abs() < 0.002, "p = {p}");
    }

    #[test]
    fn p_value_is_monotone_and_clamped() {
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
        let grid = [-6.0, -4.0, -3.0, -2.0, -1.61, -1.0, 0.0, 1.0, 2.0];
        for w in grid.windows(2) {
            assert!(mackinnon_p_value(w[0]) <= mackinnon_p_value(w[1]));
        }
        assert!(mackinnon_p_value(0.0) > 0.9);
    }

    #[test]
    fn large_sample_critical_values() {
        let cv = mackinnon_critical_values(1_000_000);
        assert!((cv.one + 3.43).abs() < 0.01);
        assert!((cv.five + 2.86).abs() < 0.01);
        assert!((cv.ten + 2.57).abs() < 0.01);

        let small = mackinnon_critical_values(50);
        assert!(small.five < cv.five);
    }
}
