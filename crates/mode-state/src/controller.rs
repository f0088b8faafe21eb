//! Live color-mode authority
//!
//! The controller holds the global effective mode for the lifetime of the
//! process. It is the sole writer of the persisted preference and the root
//! marker: every transition updates value, persistence, and marker together,
//! then notifies subscribers in registration order. It is created once by
//! bootstrap and shared by `Arc`, never through ambient globals.

use std::sync::Arc;

use parking_lot::Mutex;
use storage::{EffectiveMode, PreferenceStore};

use crate::marker::MarkerSink;

/// Handle returned by [`ModeController::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Arc<dyn Fn(EffectiveMode) + Send + Sync>;

struct ControllerState {
    current: EffectiveMode,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_id: u64,
}

/// Process-wide color-mode authority
pub struct ModeController {
    state: Mutex<ControllerState>,
    store: PreferenceStore,
    marker: Arc<dyn MarkerSink>,
}

impl ModeController {
    /// Create a controller seeded with `initial`
    ///
    /// Hosts normally go through [`bootstrap`](crate::bootstrap::bootstrap),
    /// which resolves the seed and applies the marker before first paint.
    pub fn new(
        initial: EffectiveMode,
        store: PreferenceStore,
        marker: Arc<dyn MarkerSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ControllerState {
                current: initial,
                subscribers: Vec::new(),
                next_id: 0,
            }),
            store,
            marker,
        })
    }

    /// The present global mode
    ///
    /// Overrides are resolved by [`OverrideStack`](crate::overrides::OverrideStack),
    /// not here.
    pub fn current(&self) -> EffectiveMode {
        self.state.lock().current
    }

    /// Switch the global mode to `mode`
    ///
    /// One transition: the value is updated, the concrete preference is
    /// persisted (an explicit set always turns off system tracking), the root
    /// marker is re-applied, and subscribers run last, in registration order.
    /// Setting the already-current mode re-applies persistence and marker but
    /// skips notification. Store failures are absorbed: the in-process value
    /// and marker stay authoritative for the session.
    pub fn set(&self, mode: EffectiveMode) {
        let to_notify = {
            let mut state = self.state.lock();
            let changed = state.current != mode;
            state.current = mode;
            if changed {
                state
                    .subscribers
                    .iter()
                    .map(|(_, cb)| Arc::clone(cb))
                    .collect()
            } else {
                Vec::new()
            }
        };

        if let Err(e) = self.store.set(mode.into()) {
            tracing::warn!("Preference write failed, keeping in-memory value: {}", e);
        }
        self.marker.apply(mode);

        if !to_notify.is_empty() {
            tracing::debug!(mode = %mode, "color mode changed");
        }
        // Callbacks run with the state lock released so they may read or even
        // set the mode again.
        for cb in to_notify {
            cb(mode);
        }
    }

    /// Flip between light and dark
    pub fn toggle(&self) {
        self.set(self.current().flipped());
    }

    /// Register `cb` to run after every completed transition
    ///
    /// No effect until the next transition. The returned id deregisters the
    /// callback via [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, cb: impl Fn(EffectiveMode) + Send + Sync + 'static) -> SubscriberId {
        let mut state = self.state.lock();
        let id = SubscriberId(state.next_id);
        state.next_id += 1;
        state.subscribers.push((id, Arc::new(cb)));
        id
    }

    /// Deregister a subscriber
    ///
    /// Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.state.lock().subscribers.retain(|(sid, _)| *sid != id);
    }

    /// The preference store this controller persists into
    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }
}
