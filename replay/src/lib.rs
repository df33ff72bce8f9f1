//! Playback of a finite bar sequence as if it were arriving live.
//!
//! [`ReplayEngine`] owns a cursor into a [`corelib::BarSequence`] and a
//! cancellable tick timer. Hosts read [`ReplayEngine::visible_bars`] after
//! every change (see [`ReplayEngine::subscribe`]) and recompute their
//! studies over that window.

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
mod timer;
pub mod window;

pub use config::{DEFAULT_MS_PER_BAR, MIN_MS_PER_BAR, ReplayConfig};
pub use engine::ReplayEngine;
pub use error::ReplayError;
pub use state::{PlaybackState, ReplaySnapshot};
pub use window::VisibleBars;
