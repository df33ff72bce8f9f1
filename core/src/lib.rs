pub mod error;
pub mod models;

pub use error::BarError;
pub use models::{Bar, BarSequence, OutputKind, StudyOutput, StudyPoint};
