//! Mathematical utilities: least squares and unit-root distribution tables.

pub mod mackinnon;
pub mod ols;

pub use mackinnon::*;
pub use ols::*;
