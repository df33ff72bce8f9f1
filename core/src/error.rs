use thiserror::Error;

/// Rejections raised while validating a bar sequence at load time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("bar {index} has time {time} which is not after the previous bar's time {previous}")]
    NonIncreasingTime { index: usize, previous: i64, time: i64 },

    #[error("bar {index} has a negative volume")]
    NegativeVolume { index: usize },
}
