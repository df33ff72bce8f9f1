use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// What a host needs to decide whether to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySnapshot {
    pub state: PlaybackState,
    /// Number of bars revealed so far (not an index).
    pub cursor: usize,
    /// Total bars loaded.
    pub len: usize,
}
