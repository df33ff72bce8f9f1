use corelib::{Bar, StudyOutput, StudyPoint};
use serde::{Deserialize, Serialize};

use super::period_at_least_one;
use crate::rolling_window::RollingWindow;
use crate::study::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageParams {
    #[serde(deserialize_with = "period_at_least_one")]
    pub period: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// Simple moving average of closes. Same cold-start truncation as the bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverage;

impl MovingAverage {
    pub const ID: &'static str = "sma";
}

impl Indicator for MovingAverage {
    type Params = MovingAverageParams;

    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Simple Moving Average"
    }

    fn defaults(&self) -> MovingAverageParams {
        MovingAverageParams::default()
    }

    fn compute(&self, bars: &[Bar], params: &MovingAverageParams) -> Vec<StudyOutput> {
        let mut window = RollingWindow::new(params.period);

        let points = bars
            .iter()
            .filter_map(|bar| {
                window.push(bar.close);
                if !window.is_full() {
                    return None;
                }
                window.mean().map(|value| StudyPoint {
                    time: bar.time,
                    value,
                })
            })
            .collect();

        vec![StudyOutput::line(Self::ID, points)]
    }
}
