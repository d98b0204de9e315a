//! Data acquisition and reshaping.
//!
//! - World Bank indicator fetch (`worldbank`)
//! - daily forward-fill resampling (`resample`)
//! - as-of join of prices and indicators (`merge`)

pub mod merge;
pub mod resample;
pub mod worldbank;

pub use merge::*;
pub use resample::*;
pub use worldbank::{WorldBankClient, assemble_table, parse_page, parse_period};
