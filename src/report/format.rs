//! Terminal text for the analysis results.
//!
//! Formatting lives here so the analysis code stays free of presentation and
//! output changes stay local (the tests below pin the layout).

use crate::domain::{AdfResult, Decomposition, IndicatorTable, Summary};
use crate::models::BaselineScore;

/// `describe`-style table, one statistic per row.
pub fn format_summary(summary: &Summary) -> String {
    let rows = [
        ("count", summary.count as f64),
        ("mean", summary.mean),
        ("std", summary.std),
        ("min", summary.min),
        ("25%", summary.q25),
        ("50%", summary.median),
        ("75%", summary.q75),
        ("max", summary.max),
    ];

    let mut out = String::new();
    out.push_str("Summary statistics (Price):\n");
    for (name, value) in rows {
        out.push_str(&format!("{name:<6} {:>12}\n", fmt_num(value)));
    }
    out
}

pub fn format_decomposition(decomposition: &Decomposition) -> String {
    let (lo, hi) = min_max(&decomposition.seasonal);
    let resid = finite(&decomposition.residual);
    let resid_std = if resid.len() > 1 {
        let mean = resid.iter().sum::<f64>() / resid.len() as f64;
        (resid.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (resid.len() - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut out = String::new();
    out.push_str("Seasonal decomposition (additive):\n");
    out.push_str(&format!("- period: {}\n", decomposition.period));
    out.push_str(&format!("- observations: {}\n", decomposition.observed.len()));
    out.push_str(&format!("- seasonal range: [{}, {}]\n", fmt_num(lo), fmt_num(hi)));
    out.push_str(&format!("- residual std: {}\n", fmt_num(resid_std)));
    out
}

/// ACF and PACF side by side; PACF stops at its own (shorter) lag cap.
pub fn format_acf(acf: &[f64], pacf: &[f64]) -> String {
    let mut out = String::new();
    out.push_str("Autocorrelation:\n");
    out.push_str("lag          acf     pacf\n");
    for (lag, r) in acf.iter().enumerate() {
        out.push_str(&format!("lag {lag:>3} {r:>8.4}"));
        if let Some(p) = pacf.get(lag) {
            out.push_str(&format!(" {p:>8.4}"));
        }
        out.push('\n');
    }
    out
}

pub fn format_adf(label: &str, result: &AdfResult) -> String {
    let verdict = if result.is_stationary() {
        "stationary (unit root rejected at 5%)"
    } else {
        "non-stationary (unit root not rejected at 5%)"
    };

    let mut out = String::new();
    out.push_str(&format!("ADF test ({label}):\n"));
    out.push_str(&format!("ADF Statistic: {:.4}\n", result.statistic));
    out.push_str(&format!("p-value: {:.4}\n", result.p_value));
    out.push_str(&format!("Lags used: {} | Observations: {}\n", result.used_lag, result.n_obs));
    out.push_str(&format!(
        "Critical values: 1%={:.4} 5%={:.4} 10%={:.4}\n",
        result.critical_values.one, result.critical_values.five, result.critical_values.ten
    ));
    out.push_str(&format!("Result: {verdict}\n"));
    out
}

pub fn format_split(train: usize, test: usize) -> String {
    format!("Train/test split: train={train} test={test}\n")
}

pub fn format_baselines(scores: &[BaselineScore]) -> String {
    let mut out = String::new();
    out.push_str("Forecast baselines (test partition):\n");
    out.push_str(&format!("{:<14} {:>10} {:>10} {:>8}\n", "model", "RMSE", "MAE", "R2"));
    out.push_str(&format!("{:-<14} {:-<10} {:-<10} {:-<8}\n", "", "", "", ""));
    for s in scores {
        out.push_str(&format!(
            "{:<14} {:>10.4} {:>10.4} {:>8.4}\n",
            s.name, s.metrics.rmse, s.metrics.mae, s.metrics.r2
        ));
    }
    out
}

pub fn format_fetch_summary(table: &IndicatorTable, path: &std::path::Path) -> String {
    let mut out = String::new();
    out.push_str(&format!("Indicators: {}\n", table.labels.join(", ")));
    match (table.rows.first(), table.rows.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Rows: {} | dates=[{}, {}]\n",
            table.len(),
            first.date,
            last.date
        )),
        _ => out.push_str("Rows: 0\n"),
    }
    out.push_str(&format!("Written to {}\n", path.display()));
    out
}

fn fmt_num(v: f64) -> String {
    if v.is_finite() { format!("{v:.2}") } else { "NaN".to_string() }
}

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    finite(values)
        .into_iter()
        .fold((f64::NAN, f64::NAN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
