use std::ops::{Deref, Range};

use corelib::{Bar, BarSequence};

/// Zero-copy view of the bars currently exposed to consumers.
///
/// Holds its own handle on the sequence, so it stays valid after the engine
/// loads a different one.
#[derive(Debug, Clone)]
pub struct VisibleBars {
    seq: BarSequence,
    range: Range<usize>,
}

impl VisibleBars {
    /// Trailing `window` bars of `seq[..cursor]` (all of them if `window` is None).
    pub(crate) fn new(seq: BarSequence, cursor: usize, window: Option<usize>) -> Self {
        let end = cursor.min(seq.len());
        let start = match window {
            Some(w) if end > w => end - w,
            _ => 0,
        };

        Self {
            seq,
            range: start..end,
        }
    }

    /// Position of the first visible bar within the full sequence.
    pub fn offset(&self) -> usize {
        self.range.start
    }

    pub fn to_vec(&self) -> Vec<Bar> {
        self.deref().to_vec()
    }
}

impl Deref for VisibleBars {
    type Target = [Bar];

    fn deref(&self) -> &[Bar] {
        &self.seq[self.range.clone()]
    }
}
