//! Chronological train/test split.

use tracing::info;

use crate::context::RunContext;
use crate::domain::PriceSeries;
use crate::error::AppError;

pub const DEFAULT_TRAIN_SIZE: f64 = 0.8;

/// Split at `floor(len × train_size)` into `(data[..idx], data[idx..])`.
///
/// Order is preserved; nothing is shuffled. `train_size` must lie strictly
/// between 0 and 1, since either bound would leave one partition empty.
pub fn split_data<'a, T>(
    data: &'a [T],
    train_size: f64,
    ctx: &RunContext,
) -> Result<(&'a [T], &'a [T]), AppError> {
    let _stage = ctx.stage("split_data");
    if data.is_empty() {
        return Err(AppError::EmptyData { stage: "split_data" });
    }
    if !(train_size.is_finite() && train_size > 0.0 && train_size < 1.0) {
        return Err(AppError::InvalidInput(format!(
            "train_size must be in (0, 1), got {train_size}"
        )));
    }

    let idx = (data.len() as f64 * train_size).floor() as usize;
    let (train, test) = data.split_at(idx);
    info!(train = train.len(), test = test.len(), "Data split");
    Ok((train, test))
}

/// `split_data` over a price series, keeping the date index on both halves.
pub fn split_series(
    series: &PriceSeries,
    train_size: f64,
    ctx: &RunContext,
) -> Result<(PriceSeries, PriceSeries), AppError> {
    let (train, test) = split_data(series.points(), train_size, ctx)?;
    Ok((PriceSeries::new(train.to_vec())?, PriceSeries::new(test.to_vec())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighty_twenty_preserves_order() {
        let data: Vec<u32> = (0..100).collect();
        let (train, test) = split_data(&data, 0.8, &RunContext::default()).unwrap();
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
        assert_eq!([train, test].concat(), data);
    }

    #[test]
    fn split_index_floors() {
        let data = [1, 2, 3];
        let (train, test) = split_data(&data, 0.5, &RunContext::default()).unwrap();
        assert_eq!(train, &[1]);
        assert_eq!(test, &[2, 3]);
    }

    #[test]
    fn out_of_range_train_size_is_rejected() {
        let data = [1.0, 2.0];
        let ctx = RunContext::default();
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(split_data(&data, bad, &ctx), Err(AppError::InvalidInput(_))), "{bad}");
        }
    }

    #[test]
    fn empty_input_is_an_explicit_error() {
        let data: [f64; 0] = [];
        let err = split_data(&data, DEFAULT_TRAIN_SIZE, &RunContext::default()).unwrap_err();
        assert!(matches!(err, AppError::EmptyData { .. }));
    }
}
