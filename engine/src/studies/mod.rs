pub mod bollinger;
pub mod sma;

pub use bollinger::{BollingerBands, BollingerParams};
pub use sma::{MovingAverage, MovingAverageParams};

use serde::{Deserialize, Deserializer};

/// Accepts any JSON number for a window length and normalizes it to `>= 1`.
///
/// Window lengths are UI-adjustable, so `0`, negatives and fractions
/// self-correct instead of failing the attachment.
pub(crate) fn period_at_least_one<'de, D>(d: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(d)?;
    if raw.is_finite() && raw >= 1.0 {
        Ok(raw.trunc() as usize)
    } else {
        Ok(1)
    }
}
