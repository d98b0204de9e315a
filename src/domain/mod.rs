//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - indicator definitions and fetched/daily indicator tables
//! - raw and date-indexed price tables
//! - the merged dataset
//! - analysis outputs (`Summary`, `Decomposition`, `AdfResult`, `ForecastMetrics`)

pub mod types;

pub use types::*;
