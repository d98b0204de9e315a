//! Application error type.
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`. The
//! binary maps each variant to a process exit code:
//!
//! - `2`: bad input, configuration, or local files
//! - `3`: nothing to operate on (empty or too-short data)
//! - `4`: provider or numerical failure
//! - `5`: server start-up failure

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stage was handed no data at all (e.g. the fetch never produced a table).
    #[error("{stage}: no data to operate on")]
    EmptyData { stage: &'static str },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The data provider answered with something other than the expected table.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Csv(_) | AppError::InvalidInput(_) => 2,
            AppError::EmptyData { .. } | AppError::InsufficientData(_) => 3,
            AppError::Network(_) | AppError::UnexpectedShape(_) | AppError::Numerical(_) | AppError::Plot(_) => 4,
            AppError::Server(_) => 5,
        }
    }

    pub fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        AppError::Io(format!("{context}: {err}"))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(AppError::InvalidInput("x".into()).exit_code(), 2);
        assert_eq!(AppError::EmptyData { stage: "describe_data" }.exit_code(), 3);
        assert_eq!(AppError::UnexpectedShape("object".into()).exit_code(), 4);
        assert_eq!(AppError::Server("bind".into()).exit_code(), 5);
    }

    #[test]
    fn empty_data_names_the_stage() {
        let err = AppError::EmptyData { stage: "resample_daily" };
        assert_eq!(err.to_string(), "resample_daily: no data to operate on");
    }
}
