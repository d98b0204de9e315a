//! Chart output for the EDA stage.

use std::path::PathBuf;

use tracing::info;

use crate::context::RunContext;
use crate::domain::{Decomposition, PriceSeries};
use crate::error::AppError;
use crate::plot::{render_decomposition, render_time_series, write_decomposition_svg, write_time_series_svg};

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub width: usize,
    /// Chart height; for the decomposition this is the height of each panel.
    pub height: usize,
    /// Also write an SVG file here.
    pub svg: Option<PathBuf>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
            svg: None,
        }
    }
}

/// Price-vs-date chart as terminal text, plus the optional SVG file.
pub fn plot_time_series(series: &PriceSeries, opts: &PlotOptions, ctx: &RunContext) -> Result<String, AppError> {
    let _stage = ctx.stage("plot_time_series");
    if series.is_empty() {
        return Err(AppError::EmptyData { stage: "plot_time_series" });
    }
    let dates = series.dates();
    let prices = series.prices();

    if let Some(path) = &opts.svg {
        write_time_series_svg(path, "Brent Oil Prices Over Time", &dates, &prices)?;
        info!(path = %path.display(), "Price chart written");
    }
    Ok(render_time_series("Brent Price", &dates, &prices, opts.width, opts.height))
}

/// Four-panel decomposition chart over the series' dates.
pub fn plot_decomposition(
    series: &PriceSeries,
    decomposition: &Decomposition,
    opts: &PlotOptions,
    ctx: &RunContext,
) -> Result<String, AppError> {
    let _stage = ctx.stage("plot_decomposition");
    let dates = series.dates();
    if dates.len() != decomposition.observed.len() {
        return Err(AppError::InvalidInput(format!(
            "decomposition has {} points but the series has {}",
            decomposition.observed.len(),
            dates.len()
        )));
    }

    if let Some(path) = &opts.svg {
        write_decomposition_svg(path, &dates, decomposition)?;
        info!(path = %path.display(), "Decomposition chart written");
    }
    Ok(render_decomposition(&dates, decomposition, opts.width, opts.height))
}
