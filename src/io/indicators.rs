//! Indicator table CSV read/write (`country,date,<label>...`).

use std::fs::{File, create_dir_all};
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{IndicatorRow, IndicatorTable};
use crate::error::AppError;
use crate::io::fmt_cell;

const COUNTRY_COLUMN: &str = "country";
const DATE_COLUMN: &str = "date";

/// Write the table, replacing any existing file and creating parent directories.
pub fn write_indicator_csv(path: &Path, table: &IndicatorTable) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create indicator CSV '{}'", path.display()), e))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec![COUNTRY_COLUMN.to_string(), DATE_COLUMN.to_string()];
    header.extend(table.labels.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.country.clone(), row.date.format("%Y-%m-%d").to_string()];
        record.extend(row.values.iter().map(|v| fmt_cell(*v)));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write indicator CSV '{}'", path.display()), e))?;
    info!(path = %path.display(), rows = table.len(), "Indicator data saved");
    Ok(())
}

/// Read a table previously written by `write_indicator_csv`.
pub fn read_indicator_csv(path: &Path) -> Result<IndicatorTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open indicator CSV '{}'", path.display()), e))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader.headers()?.clone();
    let names: Vec<&str> = headers.iter().map(|h| h.trim_start_matches('\u{feff}')).collect();
    if names.len() < 2 || names[0] != COUNTRY_COLUMN || names[1] != DATE_COLUMN {
        return Err(AppError::InvalidInput(format!(
            "Indicator CSV '{}' must start with `{COUNTRY_COLUMN},{DATE_COLUMN}` columns.",
            path.display()
        )));
    }
    let labels: Vec<String> = names[2..].iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result?;
        let raw_date = record.get(1).unwrap_or("");
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| AppError::Csv(format!("Invalid date '{raw_date}' on line {line}: {e}")))?;

        let mut values = Vec::with_capacity(labels.len());
        for col in 0..labels.len() {
            let raw = record.get(col + 2).unwrap_or("");
            values.push(parse_cell(raw).map_err(|_| {
                AppError::Csv(format!("Invalid value '{raw}' for '{}' on line {line}", labels[col]))
            })?);
        }

        rows.push(IndicatorRow {
            country: record.get(0).unwrap_or("").to_string(),
            date,
            values,
        });
    }

    Ok(IndicatorTable { labels, rows })
}

fn parse_cell(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create directory '{}'", parent.display()), e)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_survives_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("world_data.csv");
        let table = IndicatorTable {
            labels: vec!["GDP Growth (%)".to_string(), "Inflation Rate (%)".to_string()],
            rows: vec![IndicatorRow {
                country: "World".to_string(),
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                values: vec![Some(-3.1), None],
            }],
        };

        write_indicator_csv(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("country,date,GDP Growth (%),Inflation Rate (%)\n"));
        assert!(text.contains("World,2020-01-01,-3.1,\n"));

        assert_eq!(read_indicator_csv(&path).unwrap(), table);
    }

    #[test]
    fn foreign_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.csv");
        std::fs::write(&path, "Date,Price\n2020-01-01,1\n").unwrap();
        assert!(matches!(read_indicator_csv(&path), Err(AppError::InvalidInput(_))));
    }
}
