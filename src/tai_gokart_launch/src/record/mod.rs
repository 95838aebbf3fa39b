//! record.json generation

pub mod generator;
pub mod types;

pub use generator::RecordGenerator;
pub use types::{NodeRecord, RecordJson};
