//! Rolling-window bands (Bollinger-style).
//!
//! For every bar index `i` with at least `period` bars ending at `i`:
//! - `middle = mean(close[i+1-period ..= i])`
//! - `upper  = middle + width * sd`
//! - `lower  = middle - width * sd`
//!
//! `sd` is the population standard deviation of the same window. Bars before
//! the window first fills emit nothing (cold-start truncation, not zero-fill),
//! so all three outputs have `len - (period - 1)` points and share their
//! first time coordinate.

use corelib::{Bar, StudyOutput, StudyPoint};
use serde::{Deserialize, Serialize};

use super::period_at_least_one;
use crate::rolling_window::RollingWindow;
use crate::study::Indicator;

pub const UPPER: &str = "bb.upper";
pub const MIDDLE: &str = "bb.middle";
pub const LOWER: &str = "bb.lower";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    /// Window length in bars.
    #[serde(deserialize_with = "period_at_least_one")]
    pub period: usize,

    /// Band distance in standard deviations. Negative values act as 0.
    pub width: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerBands;

impl BollingerBands {
    pub const ID: &'static str = "bollinger";
}

impl Indicator for BollingerBands {
    type Params = BollingerParams;

    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn defaults(&self) -> BollingerParams {
        BollingerParams::default()
    }

    fn param_aliases(&self) -> &'static [(&'static str, &'static str)] {
        &[("stdDev", "width")]
    }

    fn compute(&self, bars: &[Bar], params: &BollingerParams) -> Vec<StudyOutput> {
        let period = params.period.max(1);
        let width = params.width.max(0.0);

        let cap = bars.len().saturating_sub(period - 1);
        let mut upper = Vec::with_capacity(cap);
        let mut middle = Vec::with_capacity(cap);
        let mut lower = Vec::with_capacity(cap);

        let mut window = RollingWindow::new(period);

        for bar in bars {
            window.push(bar.close);
            if !window.is_full() {
                continue;
            }

            let (Some(mean), Some(sd)) = (window.mean(), window.population_std_dev()) else {
                continue;
            };

            let time = bar.time;
            middle.push(StudyPoint { time, value: mean });
            upper.push(StudyPoint {
                time,
                value: mean + width * sd,
            });
            lower.push(StudyPoint {
                time,
                value: mean - width * sd,
            });
        }

        vec![
            StudyOutput::line(UPPER, upper),
            StudyOutput::line(MIDDLE, middle),
            StudyOutput::line(LOWER, lower),
        ]
    }
}
