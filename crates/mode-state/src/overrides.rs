//! Tree-scoped mode overrides
//!
//! A region that forces a mode pushes a frame parented to its innermost
//! enclosing frame. A point inside a mounted region sees that frame's forced
//! mode; everywhere else the global controller value applies. Frame
//! lifetimes are strictly nested: releasing a frame while an inner frame is
//! still mounted is a contract violation, while releasing twice is a
//! tolerated no-op. [`OverrideScope`] binds release to drop so every
//! teardown path, including abnormal unmount, frees the frame exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use storage::EffectiveMode;
use thiserror::Error;

use crate::controller::ModeController;
use crate::marker::MarkerSink;

/// Override stack error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    /// A frame was released while an inner frame was still mounted
    #[error("frame released out of order: an inner override frame is still mounted")]
    OutOfOrderRelease(FrameId),
}

/// Result type for override operations
pub type Result<T> = std::result::Result<T, OverrideError>;

/// Handle identifying an override frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

struct Frame {
    mode: EffectiveMode,
    parent: Option<FrameId>,
}

#[derive(Default)]
struct FrameTable {
    frames: HashMap<u64, Frame>,
    next_id: u64,
}

/// Stack of tree-scoped override frames
///
/// Released frames are removed from the table: a host that mounts and
/// unmounts regions for the whole process lifetime keeps the table bounded
/// by its current nesting depth. After an unmount the owning subtree is gone
/// too, so later lookups come in with the enclosing frame's id (or none).
pub struct OverrideStack {
    controller: Arc<ModeController>,
    table: Mutex<FrameTable>,
}

impl OverrideStack {
    /// Create an empty stack delegating to `controller` at root scope
    pub fn new(controller: Arc<ModeController>) -> Self {
        Self {
            controller,
            table: Mutex::new(FrameTable::default()),
        }
    }

    /// Force `mode` for a new region nested inside `parent`
    ///
    /// `parent` is the caller's innermost enclosing frame, `None` at root
    /// scope. Prefer [`scope`](Self::scope), which guarantees release.
    pub fn push(&self, parent: Option<FrameId>, mode: EffectiveMode) -> FrameId {
        let mut table = self.table.lock();
        let id = FrameId(table.next_id);
        table.next_id += 1;
        table.frames.insert(id.0, Frame { mode, parent });
        id
    }

    /// Release a frame
    ///
    /// Releasing an already-released frame is a no-op, so teardown code may
    /// release twice. Releasing a frame whose child is still mounted returns
    /// [`OverrideError::OutOfOrderRelease`]: the host's acquire/release
    /// pairing is broken.
    pub fn pop(&self, id: FrameId) -> Result<()> {
        let mut table = self.table.lock();
        if !table.frames.contains_key(&id.0) {
            return Ok(());
        }
        let has_mounted_child = table.frames.values().any(|f| f.parent == Some(id));
        if has_mounted_child {
            return Err(OverrideError::OutOfOrderRelease(id));
        }
        table.frames.remove(&id.0);
        Ok(())
    }

    /// The mode visible at a point whose innermost enclosing frame is `point`
    ///
    /// A mounted frame's forced mode wins; a released or unknown frame id is
    /// root scope, so the global controller value applies.
    pub fn resolve(&self, point: Option<FrameId>) -> EffectiveMode {
        if let Some(id) = point {
            if let Some(frame) = self.table.lock().frames.get(&id.0) {
                return frame.mode;
            }
        }
        self.controller.current()
    }

    /// Push a frame whose release is bound to the returned guard
    pub fn scope(&self, parent: Option<FrameId>, mode: EffectiveMode) -> OverrideScope<'_> {
        OverrideScope {
            stack: self,
            id: self.push(parent, mode),
        }
    }

    /// Like [`scope`](Self::scope), also applying `mode` to the region's own
    /// scoped marker on mount
    pub fn scope_with_marker(
        &self,
        parent: Option<FrameId>,
        mode: EffectiveMode,
        marker: &dyn MarkerSink,
    ) -> OverrideScope<'_> {
        marker.apply(mode);
        self.scope(parent, mode)
    }

    /// The controller this stack falls back to at root scope
    pub fn controller(&self) -> &Arc<ModeController> {
        &self.controller
    }

    /// Number of currently mounted frames
    pub fn live_frames(&self) -> usize {
        self.table.lock().frames.len()
    }
}

/// RAII override region
///
/// Acquired when a region mounts; dropping it releases the frame on every
/// teardown path. Dropping after an explicit [`OverrideStack::pop`] is a
/// no-op.
pub struct OverrideScope<'a> {
    stack: &'a OverrideStack,
    id: FrameId,
}

impl OverrideScope<'_> {
    /// The frame handle, used to nest child regions and to resolve inside
    /// this region
    pub fn id(&self) -> FrameId {
        self.id
    }
}

impl Drop for OverrideScope<'_> {
    fn drop(&mut self) {
        // An out-of-order release here means a child guard outlived its
        // parent; nothing sensible can be surfaced from drop.
        let _ = self.stack.pop(self.id);
    }
}
