use std::num::NonZeroUsize;

/// Lower bound on the tick cadence. Faster requests are clamped to this.
pub const MIN_MS_PER_BAR: u64 = 10;

pub const DEFAULT_MS_PER_BAR: u64 = 120;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Milliseconds between tick-driven cursor advances.
    ///
    /// UI-adjustable; values below [`MIN_MS_PER_BAR`] are clamped rather than
    /// rejected.
    pub ms_per_bar: u64,

    /// Optional cap on how many trailing revealed bars are exposed.
    ///
    /// `None` exposes every revealed bar. Only affects `visible_bars`, never
    /// the cursor.
    pub window_size: Option<NonZeroUsize>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            ms_per_bar: DEFAULT_MS_PER_BAR,
            window_size: None,
        }
    }
}

impl ReplayConfig {
    /// Reads `REPLAY_MS_PER_BAR` and `REPLAY_WINDOW_SIZE`.
    ///
    /// Missing or unparsable values fall back to defaults; a window size of
    /// `0` means "no cap".
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReplayConfig::from_env`] with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ms_per_bar = lookup("REPLAY_MS_PER_BAR")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.ms_per_bar);

        let window_size = lookup("REPLAY_WINDOW_SIZE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(NonZeroUsize::new);

        Self {
            ms_per_bar,
            window_size,
        }
        .normalized()
    }

    pub fn with_ms_per_bar(mut self, ms_per_bar: u64) -> Self {
        self.ms_per_bar = ms_per_bar;
        self.normalized()
    }

    /// `0` clears the cap.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = NonZeroUsize::new(window_size);
        self
    }

    pub fn normalized(mut self) -> Self {
        self.ms_per_bar = clamp_ms_per_bar(self.ms_per_bar);
        self
    }
}

pub(crate) fn clamp_ms_per_bar(v: u64) -> u64 {
    v.max(MIN_MS_PER_BAR)
}
