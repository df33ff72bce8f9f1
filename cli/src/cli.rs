use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use engine::studies::{BollingerBands, MovingAverage};
use replay::ReplayConfig;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StudyCli {
    Bollinger,
    Sma,
}

impl StudyCli {
    /// Registry id of the selected study.
    pub fn id(self) -> &'static str {
        match self {
            StudyCli::Bollinger => BollingerBands::ID,
            StudyCli::Sma => MovingAverage::ID,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(name = "replay-demo", version)]
pub struct Cli {
    /// JSON array of bars to replay. A random walk is generated when absent
    #[clap(long)]
    pub bars: Option<PathBuf>,

    /// Number of bars to generate when no file is given
    #[clap(long, default_value_t = 200)]
    pub points: usize,

    /// Playback cadence; overrides REPLAY_MS_PER_BAR
    #[clap(long)]
    pub ms_per_bar: Option<u64>,

    /// Trailing bars exposed to studies (0 = all); overrides REPLAY_WINDOW_SIZE
    #[clap(long)]
    pub window_size: Option<usize>,

    /// Study attached to the replayed bars
    #[clap(long, value_enum, default_value_t = StudyCli::Bollinger)]
    pub study: StudyCli,

    /// Study window length
    #[clap(long)]
    pub period: Option<u32>,

    /// Band width in standard deviations (bollinger only)
    #[clap(long)]
    pub width: Option<f64>,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Applies flag overrides on top of `base` (usually the env config).
    pub fn replay_config(&self, base: ReplayConfig) -> ReplayConfig {
        let mut cfg = base;
        if let Some(ms) = self.ms_per_bar {
            cfg = cfg.with_ms_per_bar(ms);
        }
        if let Some(w) = self.window_size {
            cfg = cfg.with_window_size(w);
        }
        cfg.normalized()
    }

    /// Only the keys the user actually passed; the registry fills in the rest.
    pub fn study_params(&self) -> Option<Value> {
        let mut params = Map::new();
        if let Some(period) = self.period {
            params.insert("period".into(), json!(period));
        }
        if let (StudyCli::Bollinger, Some(width)) = (self.study, self.width) {
            params.insert("width".into(), json!(width));
        }

        (!params.is_empty()).then_some(Value::Object(params))
    }
}
