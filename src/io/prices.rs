//! Brent price CSV loading.
//!
//! The loader is strict: a missing file, a missing `Date`/`Price` column, or a
//! price that does not parse is an error for the caller. Dates are kept as text
//! here; `eda::format_date` owns date parsing.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use csv::StringRecord;
use tracing::{error, info};

use crate::context::RunContext;
use crate::domain::{RawPriceRow, RawPriceTable};
use crate::error::AppError;

pub const DATE_COLUMN: &str = "Date";
pub const PRICE_COLUMN: &str = "Price";

/// Load a price CSV into a raw table, logging and propagating any failure.
pub fn load_prices(path: &Path, ctx: &RunContext) -> Result<RawPriceTable, AppError> {
    let _stage = ctx.stage("load_data");
    let started = Instant::now();

    match read_prices(path) {
        Ok(table) => {
            info!(path = %path.display(), rows = table.len(), "Data loaded successfully");
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "Data loading completed");
            Ok(table)
        }
        Err(e) => {
            error!(path = %path.display(), "Error loading data: {e}");
            Err(e)
        }
    }
}

fn read_prices(path: &Path) -> Result<RawPriceTable, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(format!("Failed to open CSV '{}'", path.display()), e))?;
    read_prices_from(file)
}

/// Parse price rows from any reader (file contents, test fixtures).
pub fn read_prices_from<R: std::io::Read>(reader: R) -> Result<RawPriceTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Csv(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = column_index(&header_map, DATE_COLUMN)?;
    let price_idx = column_index(&header_map, PRICE_COLUMN)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::Csv(format!("CSV parse error on line {line}: {e}")))?;

        let date = record.get(date_idx).unwrap_or("").to_string();
        let raw_price = record.get(price_idx).unwrap_or("");
        let price = parse_price(raw_price).ok_or_else(|| {
            AppError::Csv(format!("Invalid {PRICE_COLUMN} '{raw_price}' on line {line}"))
        })?;

        rows.push(RawPriceRow { date, price });
    }

    Ok(RawPriceTable { rows })
}

fn parse_price(raw: &str) -> Option<f64> {
    let v = raw.trim().replace(',', "").parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&name.to_ascii_lowercase())
        .copied()
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required column: `{name}`")))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_date_and_price_columns() {
        let csv = "\u{feff}Date,Price,Volume\n20-May-87,18.63,1\n\"Apr 22, 2020\",13.77,2\n";
        let table = read_prices_from(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].date, "20-May-87");
        assert_eq!(table.rows[0].price, 18.63);
        assert_eq!(table.rows[1].date, "Apr 22, 2020");
    }

    #[test]
    fn missing_price_column_is_rejected() {
        let err = read_prices_from("Date,Close\n2020-01-01,1.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("Price"));
    }

    #[test]
    fn unparseable_price_propagates_with_line() {
        let err = read_prices_from("Date,Price\n2020-01-01,1.0\n2020-01-02,n/a\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prices(&dir.path().join("absent.csv"), &RunContext::default()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Price").unwrap();
        writeln!(file, "2020-01-02,66.25").unwrap();
        let table = load_prices(file.path(), &RunContext::default()).unwrap();
        assert_eq!(table.rows[0].price, 66.25);
    }
}
