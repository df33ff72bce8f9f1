pub mod command;
pub mod error;
pub mod registration;
pub mod rolling_window;
pub mod studies;
pub mod study;

pub use error::{CommandError, StudyError};
pub use registration::Registration;
