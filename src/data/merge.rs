//! Join daily prices with daily indicator rows.

use tracing::{info, warn};

use crate::context::RunContext;
use crate::domain::{DailyIndicators, MergedDataset, MergedRow, PriceSeries};
use crate::error::AppError;

/// As-of join: each price date takes the latest indicator row on or before it.
///
/// Prices earlier than the first indicator row keep every indicator missing.
/// Without indicators the result carries the prices alone.
pub fn merge_datasets(
    series: &PriceSeries,
    indicators: Option<&DailyIndicators>,
    ctx: &RunContext,
) -> Result<MergedDataset, AppError> {
    let _stage = ctx.stage("merge_datasets");
    if series.is_empty() {
        return Err(AppError::EmptyData { stage: "merge_datasets" });
    }

    let Some(daily) = indicators else {
        warn!("No indicator data; merged dataset holds prices only");
        let rows = series
            .points()
            .iter()
            .map(|p| MergedRow {
                date: p.date,
                price: p.price,
                values: Vec::new(),
            })
            .collect();
        return Ok(MergedDataset { labels: Vec::new(), rows });
    };

    let width = daily.labels.len();
    let mut unmatched = 0usize;
    let rows: Vec<MergedRow> = series
        .points()
        .iter()
        .map(|p| {
            let values = match daily.as_of(p.date) {
                Some(row) => row.values.clone(),
                None => {
                    unmatched += 1;
                    vec![None; width]
                }
            };
            MergedRow {
                date: p.date,
                price: p.price,
                values,
            }
        })
        .collect();

    if unmatched > 0 {
        warn!(unmatched, "Price dates before the first indicator observation");
    }
    info!(rows = rows.len(), indicators = width, "Datasets merged");
    Ok(MergedDataset {
        labels: daily.labels.clone(),
        rows,
    })
}
