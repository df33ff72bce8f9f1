use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("replay engine requires a tokio runtime to arm its tick timer")]
    NoRuntime,
}
