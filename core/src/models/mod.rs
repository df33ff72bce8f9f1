pub mod bar;
pub mod study_output;

pub use bar::{Bar, BarSequence};
pub use study_output::{OutputKind, StudyOutput, StudyPoint};
