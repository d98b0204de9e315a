//! Chart rendering: terminal ASCII and static SVG.
//!
//! Both renderers plot against "days since the first date" on the x axis and
//! skip non-finite values (the decomposition trend is `NaN` at both edges).

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use chrono::NaiveDate;

/// x coordinates: days elapsed since `dates[0]`.
pub(crate) fn day_offsets(dates: &[NaiveDate]) -> Vec<f64> {
    match dates.first() {
        Some(&first) => dates.iter().map(|d| (*d - first).num_days() as f64).collect(),
        None => Vec::new(),
    }
}

/// Padded `(min, max)` over the finite values, or `None` when there are none.
pub(crate) fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some(pad_range(min, max, 0.05))
    } else {
        Some((min - 1.0, max + 1.0))
    }
}

/// x range over the offsets; a single date gets a unit-wide window.
pub(crate) fn x_range(xs: &[f64]) -> (f64, f64) {
    let min = xs.first().copied().unwrap_or(0.0);
    let max = xs.last().copied().unwrap_or(0.0);
    if max > min { (min, max) } else { (min - 1.0, max + 1.0) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

/// Contiguous runs of finite `(x, y)` pairs.
pub(crate) fn finite_runs(xs: &[f64], ys: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_split_on_nan() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [f64::NAN, 1.0, 2.0, f64::NAN, 4.0];
        let runs = finite_runs(&xs, &ys);
        assert_eq!(runs, vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0)]]);
    }

    #[test]
    fn flat_series_gets_a_visible_range() {
        assert_eq!(value_range(&[5.0, 5.0]), Some((4.0, 6.0)));
        assert_eq!(value_range(&[f64::NAN]), None);
    }
}
