//! Input/output helpers.
//!
//! - Brent price CSV loading (`prices`)
//! - indicator table CSV read/write (`indicators`)
//! - merged dataset CSV + JSON records (`merged`)

pub mod indicators;
pub mod merged;
pub mod prices;

pub use indicators::*;
pub use merged::*;
pub use prices::*;

/// Format an optional value for a CSV cell (missing → empty).
pub(crate) fn fmt_cell(value: Option<f64>) -> String {
    value.map(fmt_float).unwrap_or_default()
}

/// Float text that always reads back as a float: whole numbers keep `.0`.
pub(crate) fn fmt_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_keep_a_decimal_point() {
        assert_eq!(fmt_float(68.0), "68.0");
        assert_eq!(fmt_float(-3.0), "-3.0");
        assert_eq!(fmt_float(66.25), "66.25");
        assert_eq!(fmt_cell(None), "");
    }
}
