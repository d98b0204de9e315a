//! Static SVG charts via Plotters.

use std::path::Path;

use chrono::{Days, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::Decomposition;
use crate::error::AppError;
use crate::io::indicators::ensure_parent_dir;

use super::{day_offsets, finite_runs, value_range, x_range};

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Write a single line chart of `values` against `dates`.
pub fn write_time_series_svg(path: &Path, title: &str, dates: &[NaiveDate], values: &[f64]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    draw_panel(&root, title, dates, values)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Four stacked panels: observed, trend, seasonal, residual.
pub fn write_decomposition_svg(path: &Path, dates: &[NaiveDate], decomposition: &Decomposition) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let root = SVGBackend::new(path, (1000, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let panels = [
        ("Observed", &decomposition.observed),
        ("Trend", &decomposition.trend),
        ("Seasonal", &decomposition.seasonal),
        ("Residual", &decomposition.residual),
    ];
    for (area, (title, values)) in root.split_evenly((4, 1)).iter().zip(panels) {
        draw_panel(area, title, dates, values)?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, title: &str, dates: &[NaiveDate], values: &[f64]) -> Result<(), AppError> {
    let xs = day_offsets(dates);
    let (x0, x1) = x_range(&xs);
    let (y0, y1) = value_range(values).unwrap_or((0.0, 1.0));
    let first = dates.first().copied();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    let label_date = |v: &f64| match first {
        Some(d) if *v >= 0.0 => d
            .checked_add_days(Days::new(v.round() as u64))
            .map(|d| d.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(6)
        .y_labels(5)
        .x_label_formatter(&label_date)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()
        .map_err(plot_err)?;

    for run in finite_runs(&xs, values) {
        chart
            .draw_series(LineSeries::new(run, &LINE_COLOR))
            .map_err(plot_err)?;
    }
    Ok(())
}

fn plot_err(err: impl std::fmt::Display) -> AppError {
    AppError::Plot(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: u32) -> Vec<NaiveDate> {
        (1..=n).map(|d| NaiveDate::from_ymd_opt(2021, 3, d).unwrap()).collect()
    }

    #[test]
    fn writes_time_series_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/price.svg");
        write_time_series_svg(&path, "Brent", &days(5), &[70.0, 71.5, 69.0, 72.0, 73.1]).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Brent"));
    }

    #[test]
    fn writes_decomposition_svg_with_nan_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decomposition.svg");
        let n = 6;
        let d = Decomposition {
            period: 2,
            observed: vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0],
            trend: vec![f64::NAN, 1.5, 1.5, 1.5, 1.5, f64::NAN],
            seasonal: vec![-0.5, 0.5, -0.5, 0.5, -0.5, 0.5],
            residual: vec![f64::NAN, 0.0, 0.0, 0.0, 0.0, f64::NAN],
        };
        write_decomposition_svg(&path, &days(n), &d).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Residual"));
    }
}
