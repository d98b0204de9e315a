//! Exploratory data analysis over a loaded price table.
//!
//! Each operation takes the previous stage's output and returns a new value:
//!
//! `RawPriceTable --format_date--> PriceSeries --> Summary / Decomposition / ACF`
//!
//! Chart output goes through `plot` (terminal text, optional SVG).

pub mod acf;
pub mod dates;
pub mod decompose;
pub mod describe;
pub mod plot;

pub use acf::*;
pub use dates::*;
pub use decompose::*;
pub use describe::*;
pub use plot::*;
