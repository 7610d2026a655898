//! Core of the sensor dashboard: turns an uploaded CSV into a cleaned
//! time/value series, summary statistics, a range-filtered view and a CSV
//! export. The desktop UI in `main.rs` only calls into this crate.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use data::export::{export_csv, export_file_name};
pub use data::filter::{filter_range, FilteredView, RangeFilter};
pub use data::loader::{load_file, parse_csv};
pub use data::model::{CleanedDataset, ColumnSelection, RawTable};
pub use data::normalize::normalize;
pub use error::{Error, Result};
pub use stats::{describe, SummaryStatistics};
