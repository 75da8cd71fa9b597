//! Parsing of the iostat output stream into metric observations.

pub mod data;
pub mod driver;
pub mod parser;

pub use data::{Observation, Schema, TableKind};
pub use driver::{DriverState, SampleDriver};
pub use parser::{extract_observations, extract_schema};
