use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudyError {
    #[error("study already registered: {0}")]
    DuplicateId(String),

    #[error("unknown study: {0}")]
    UnknownStudy(String),

    #[error("invalid parameters for study {study}: {reason}")]
    InvalidParams { study: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("command already registered: {0}")]
    DuplicateId(String),
}
