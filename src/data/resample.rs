//! Upsample indicator tables to daily frequency.

use chrono::Days;
use tracing::info;

use crate::context::RunContext;
use crate::domain::{DailyIndicators, DailyRow, IndicatorTable};
use crate::error::AppError;

/// Resample to one row per calendar day, forward-filling from the latest observation.
///
/// The output spans the first through the last observed date (inclusive). A
/// day takes the whole row of the most recent observation on or before it, so
/// a value missing at an observation stays missing until the next observation.
/// Several countries on the same date collapse to the last row for that date.
pub fn resample_daily(table: &IndicatorTable, ctx: &RunContext) -> Result<DailyIndicators, AppError> {
    let _stage = ctx.stage("resample_daily");
    if table.is_empty() {
        return Err(AppError::EmptyData { stage: "resample_daily" });
    }

    let mut observed: Vec<(chrono::NaiveDate, &Vec<Option<f64>>)> =
        table.rows.iter().map(|r| (r.date, &r.values)).collect();
    observed.sort_by_key(|(date, _)| *date);

    let first = observed[0].0;
    let last = observed[observed.len() - 1].0;
    let span = (last - first).num_days() as usize + 1;

    let mut rows = Vec::with_capacity(span);
    let mut cursor = 0usize;
    let mut day = first;
    while day <= last {
        while cursor + 1 < observed.len() && observed[cursor + 1].0 <= day {
            cursor += 1;
        }
        rows.push(DailyRow {
            date: day,
            values: observed[cursor].1.clone(),
        });
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    info!(observations = table.len(), days = rows.len(), "Resampled indicators to daily frequency");

    Ok(DailyIndicators {
        labels: table.labels.clone(),
        rows,
    })
}
