//! Externally observable mode markers
//!
//! The marker is what styling rules consume to pick light or dark
//! presentation: a root attribute in a document tree, a window property, a
//! terminal palette. The engine is the only writer; it applies the currently
//! effective mode synchronously on bootstrap and on every transition, and
//! override regions apply their forced mode to a scoped sink of their own.

use parking_lot::Mutex;
use storage::EffectiveMode;

/// Sink for the observable mode marker of one scope
pub trait MarkerSink: Send + Sync {
    /// Make `mode` the externally visible value for this scope
    fn apply(&self, mode: EffectiveMode);
}

/// Marker that records every applied mode
///
/// Useful for tests and headless hosts; real hosts bind [`MarkerSink`] to
/// whatever their styling layer reads.
#[derive(Debug, Default)]
pub struct RecordingMarker {
    applied: Mutex<Vec<EffectiveMode>>,
}

impl RecordingMarker {
    /// Create an empty marker
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible value, if any mode has been applied yet
    pub fn current(&self) -> Option<EffectiveMode> {
        self.applied.lock().last().copied()
    }

    /// Every value applied so far, in order
    pub fn history(&self) -> Vec<EffectiveMode> {
        self.applied.lock().clone()
    }
}

impl MarkerSink for RecordingMarker {
    fn apply(&self, mode: EffectiveMode) {
        self.applied.lock().push(mode);
    }
}
