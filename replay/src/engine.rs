//! Playback state machine.
//!
//! Responsibilities:
//! - Own the loaded bar sequence and a cursor in `[0, N]` (bars revealed so far).
//! - Drive the cursor forward at a fixed cadence while `Playing`.
//! - Expose the trailing window of revealed bars.
//!
//! Timer discipline:
//! - At most one tick task is armed per engine. Every transition disarms the
//!   current task before changing state, under the same lock.
//! - Each arming gets a fresh generation; a tick whose generation is no longer
//!   current is discarded, so a task torn down mid-tick cannot advance the cursor.
//! - Re-arming on a speed change happens under one lock acquisition: no window
//!   exists where the old and new cadence are both live.

use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;

use corelib::BarSequence;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::config::{ReplayConfig, clamp_ms_per_bar};
use crate::error::ReplayError;
use crate::state::{PlaybackState, ReplaySnapshot};
use crate::timer::TickTimer;
use crate::window::VisibleBars;

/// Replays a bar sequence as if it were arriving live.
///
/// All operations are synchronous and run to completion. The only
/// asynchronous element is the tick task spawned on `runtime` while playing.
/// Dropping the engine disarms the timer.
pub struct ReplayEngine {
    shared: Arc<Mutex<Playback>>,
    runtime: Handle,
}

struct Playback {
    bars: BarSequence,
    cursor: usize,
    state: PlaybackState,
    ms_per_bar: u64,
    window_size: Option<NonZeroUsize>,

    /// Currently armed tick task, if any.
    timer: Option<TickTimer>,
    /// Bumped on every arming.
    generation: u64,

    updates: watch::Sender<ReplaySnapshot>,
}

impl ReplayEngine {
    /// Creates a stopped engine with no bars. Ticks are spawned on `runtime`.
    pub fn new(config: ReplayConfig, runtime: Handle) -> Self {
        let config = config.normalized();
        let (updates, _) = watch::channel(ReplaySnapshot::default());

        Self {
            shared: Arc::new(Mutex::new(Playback {
                bars: BarSequence::empty(),
                cursor: 0,
                state: PlaybackState::Stopped,
                ms_per_bar: config.ms_per_bar,
                window_size: config.window_size,
                timer: None,
                generation: 0,
                updates,
            })),
            runtime,
        }
    }

    /// Creates an engine bound to the runtime of the calling context.
    pub fn from_current(config: ReplayConfig) -> Result<Self, ReplayError> {
        let runtime = Handle::try_current().map_err(|_| ReplayError::NoRuntime)?;
        Ok(Self::new(config, runtime))
    }

    /// Stops any playback, replaces the sequence and resets the cursor.
    #[instrument(skip(self, bars), target = "replay", fields(bars = bars.len()))]
    pub fn load(&self, bars: BarSequence) {
        let mut p = self.shared.lock();
        p.stop();
        p.bars = bars;
        p.cursor = 0;
        p.publish();
        info!("bar sequence loaded");
    }

    /// Restarts playback from the first bar.
    ///
    /// With no bars loaded the engine stays `Stopped`.
    pub fn start(&self) {
        let mut p = self.shared.lock();
        p.stop();

        if p.bars.is_empty() {
            debug!(target: "replay", "start ignored: no bars loaded");
            p.publish();
            return;
        }

        p.cursor = 1;
        p.state = PlaybackState::Playing;
        self.arm(&mut p);
        p.publish();
        info!(target: "replay", ms_per_bar = p.ms_per_bar, len = p.bars.len(), "playback started");
    }

    /// `Playing` -> `Paused`. No-op from any other state.
    pub fn pause(&self) {
        let mut p = self.shared.lock();
        if p.state != PlaybackState::Playing {
            return;
        }

        p.disarm();
        p.state = PlaybackState::Paused;
        p.publish();
        debug!(target: "replay", cursor = p.cursor, "playback paused");
    }

    /// `Paused` -> `Playing` at the current cadence. No-op otherwise.
    pub fn resume(&self) {
        let mut p = self.shared.lock();
        if p.state != PlaybackState::Paused {
            return;
        }

        p.state = PlaybackState::Playing;
        self.arm(&mut p);
        p.publish();
        debug!(target: "replay", cursor = p.cursor, "playback resumed");
    }

    /// Disarms the timer and rewinds to nothing revealed. Safe from any state.
    pub fn stop(&self) {
        let mut p = self.shared.lock();
        p.stop();
        p.publish();
    }

    /// Changes the cadence (clamped to >= 10ms).
    ///
    /// While playing, the old timer is torn down and a new one armed in the
    /// same critical section.
    pub fn set_ms_per_bar(&self, ms_per_bar: u64) {
        let mut p = self.shared.lock();
        p.ms_per_bar = clamp_ms_per_bar(ms_per_bar);

        if p.state == PlaybackState::Playing {
            p.disarm();
            self.arm(&mut p);
        }
        debug!(target: "replay", ms_per_bar = p.ms_per_bar, "cadence changed");
    }

    /// Caps how many trailing revealed bars `visible_bars` exposes.
    pub fn set_window_size(&self, window_size: Option<NonZeroUsize>) {
        let mut p = self.shared.lock();
        p.window_size = window_size;
        // Cursor is unchanged but the visible window may differ; nudge hosts.
        p.updates.send_modify(|_| {});
    }

    /// Moves the cursor to `index`, clamped to `[0, N]`. State is unchanged.
    pub fn seek(&self, index: usize) {
        let mut p = self.shared.lock();
        p.seek(index);
    }

    pub fn step_forward(&self) {
        let mut p = self.shared.lock();
        let next = p.cursor.saturating_add(1);
        p.seek(next);
    }

    pub fn step_back(&self) {
        let mut p = self.shared.lock();
        let prev = p.cursor.saturating_sub(1);
        p.seek(prev);
    }

    /// Advances the cursor by one bar; reaching the end stops playback.
    ///
    /// Normally driven by the timer. Only acts while `Playing`.
    pub fn tick(&self) {
        self.shared.lock().tick();
    }

    /// Bars revealed so far, limited to the trailing `window_size`.
    pub fn visible_bars(&self) -> VisibleBars {
        let p = self.shared.lock();
        VisibleBars::new(
            p.bars.clone(),
            p.cursor,
            p.window_size.map(NonZeroUsize::get),
        )
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.lock().state
    }

    pub fn cursor(&self) -> usize {
        self.shared.lock().cursor
    }

    pub fn len(&self) -> usize {
        self.shared.lock().bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().bars.is_empty()
    }

    pub fn ms_per_bar(&self) -> u64 {
        self.shared.lock().ms_per_bar
    }

    pub fn window_size(&self) -> Option<NonZeroUsize> {
        self.shared.lock().window_size
    }

    /// The full loaded sequence.
    pub fn bars(&self) -> BarSequence {
        self.shared.lock().bars.clone()
    }

    pub fn snapshot(&self) -> ReplaySnapshot {
        self.shared.lock().snapshot()
    }

    /// Change feed: a new value is published whenever state or cursor changes.
    pub fn subscribe(&self) -> watch::Receiver<ReplaySnapshot> {
        self.shared.lock().updates.subscribe()
    }

    /// Arms a fresh tick task for the current cadence. Caller holds the lock
    /// and has already disarmed any previous task.
    fn arm(&self, p: &mut Playback) {
        debug_assert!(p.timer.is_none(), "arming over a live timer");

        p.generation = p.generation.wrapping_add(1);
        let generation = p.generation;
        let period = Duration::from_millis(p.ms_per_bar);
        let shared: Weak<Mutex<Playback>> = Arc::downgrade(&self.shared);

        p.timer = Some(TickTimer::arm(&self.runtime, generation, period, move || {
            let Some(shared) = shared.upgrade() else {
                return false;
            };
            let mut p = shared.lock();
            p.tick_from_timer(generation)
        }));
    }
}

impl Drop for ReplayEngine {
    fn drop(&mut self) {
        self.shared.lock().disarm();
    }
}

impl Playback {
    fn snapshot(&self) -> ReplaySnapshot {
        ReplaySnapshot {
            state: self.state,
            cursor: self.cursor,
            len: self.bars.len(),
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.updates.send_if_modified(|cur| {
            if *cur == next {
                return false;
            }
            *cur = next;
            true
        });
    }

    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn stop(&mut self) {
        self.disarm();
        if self.state != PlaybackState::Stopped || self.cursor != 0 {
            debug!(target: "replay", from = %self.state, cursor = self.cursor, "playback stopped");
        }
        self.state = PlaybackState::Stopped;
        self.cursor = 0;
    }

    fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.bars.len());
        self.publish();
    }

    /// Returns whether playback continues.
    fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        let len = self.bars.len();
        let next = self.cursor + 1;

        if next >= len {
            // The full sequence is revealed for one published frame, then
            // playback stops and rewinds like an explicit stop.
            self.cursor = len;
            self.publish();
            self.stop();
            self.publish();
            info!(target: "replay", len, "end of sequence reached");
            return false;
        }

        self.cursor = next;
        self.publish();
        true
    }

    fn tick_from_timer(&mut self, generation: u64) -> bool {
        match &self.timer {
            Some(t) if t.generation() == generation => self.tick(),
            // Superseded or disarmed while this tick was in flight.
            _ => false,
        }
    }
}
