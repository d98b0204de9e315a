//! Model builder: train/test split, stationarity testing and baseline forecasts.
//!
//! Everything here works on plain `&[f64]` price slices so the same functions
//! serve the levels, the differenced series and tests alike.

pub mod adf;
pub mod forecast;
pub mod split;

pub use adf::*;
pub use forecast::*;
pub use split::*;
