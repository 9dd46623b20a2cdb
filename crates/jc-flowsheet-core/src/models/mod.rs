//! Domain models for the JC flowsheet.

mod infusion;
mod jc_measurement;
mod risk;
mod validation;

pub use infusion::*;
pub use jc_measurement::*;
pub use risk::*;
pub use validation::*;
