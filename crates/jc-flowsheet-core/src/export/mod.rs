//! Export functionality for CSV downloads and JSON snapshots.

mod csv;
mod patient;

pub use csv::*;
pub use patient::*;
