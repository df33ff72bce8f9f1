use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BarError;

/// One OHLC(V) observation for a fixed time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket open time, unix seconds (UTC).
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Immutable, time-ordered list of bars.
///
/// Guarantees:
/// - `time` is strictly increasing (no two bars share a timestamp).
/// - volume, when present, is non-negative.
///
/// Cloning is cheap: the bars live behind an `Arc` and are never mutated.
#[derive(Debug, Clone)]
pub struct BarSequence {
    bars: Arc<[Bar]>,
}

impl BarSequence {
    /// Validates and wraps `bars`.
    pub fn new(bars: Vec<Bar>) -> Result<Self, BarError> {
        for (index, bar) in bars.iter().enumerate() {
            if let Some(v) = bar.volume {
                if v < 0.0 {
                    return Err(BarError::NegativeVolume { index });
                }
            }

            if index > 0 {
                let previous = bars[index - 1].time;
                if bar.time <= previous {
                    return Err(BarError::NonIncreasingTime {
                        index,
                        previous,
                        time: bar.time,
                    });
                }
            }
        }

        Ok(Self { bars: bars.into() })
    }

    pub fn empty() -> Self {
        Self {
            bars: Arc::from(Vec::new()),
        }
    }

    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }
}

impl Default for BarSequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for BarSequence {
    type Target = [Bar];

    fn deref(&self) -> &[Bar] {
        &self.bars
    }
}

impl TryFrom<Vec<Bar>> for BarSequence {
    type Error = BarError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}
