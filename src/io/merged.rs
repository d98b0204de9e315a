//! Merged dataset CSV output and record loading for the HTTP endpoint.

use std::fs::File;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::info;

use crate::domain::MergedDataset;
use crate::error::AppError;
use crate::io::{fmt_cell, fmt_float};
use crate::io::indicators::ensure_parent_dir;
use crate::io::prices::{DATE_COLUMN, PRICE_COLUMN};

/// One CSV row as a JSON object keyed by header name.
pub type Record = Map<String, Value>;

/// Write `Date,Price,<labels>` rows, replacing any existing file.
///
/// Numbers are written as floats throughout, so a whole price such as `68`
/// still loads back as `68.0`.
pub fn write_merged_csv(path: &Path, dataset: &MergedDataset) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create merged CSV '{}'", path.display()), e))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec![DATE_COLUMN.to_string(), PRICE_COLUMN.to_string()];
    header.extend(dataset.labels.iter().cloned());
    writer.write_record(&header)?;

    for row in &dataset.rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string(), fmt_float(row.price)];
        record.extend(row.values.iter().map(|v| fmt_cell(*v)));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write merged CSV '{}'", path.display()), e))?;
    info!(path = %path.display(), rows = dataset.rows.len(), "Merged data saved");
    Ok(())
}

/// Load any headed CSV as JSON records (one object per row, keys = header).
///
/// Cells become `null` when empty, integers or floats when numeric, and
/// strings otherwise.
pub fn load_records(path: &Path) -> Result<Vec<Record>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open merged CSV '{}'", path.display()), e))?;
    read_records_from(file)
}

pub fn read_records_from<R: std::io::Read>(reader: R) -> Result<Vec<Record>, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(key, cell)| (key.clone(), cell_value(cell)))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    match cell.parse::<f64>() {
        // NaN/inf have no JSON form.
        Ok(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Err(_) => Value::String(cell.to_string()),
    }
}
