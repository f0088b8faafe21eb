//! Color-mode state engine for Nightfall
//!
//! This crate owns the mode-resolution and synchronization logic: a one-time
//! bootstrap that resolves the effective mode before the first paint, a live
//! controller that keeps the running app, the persisted preference, and the
//! observable marker in lock-step, a stack of tree-scoped overrides, and a
//! pure light/dark value resolver.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod controller;
pub mod marker;
pub mod overrides;
pub mod resolve;

pub use bootstrap::{bootstrap, BootstrapConfig, Bootstrapped};
pub use controller::{ModeController, SubscriberId};
pub use marker::{MarkerSink, RecordingMarker};
pub use overrides::{FrameId, OverrideError, OverrideScope, OverrideStack};
pub use resolve::{resolve_value, ModeValues};
