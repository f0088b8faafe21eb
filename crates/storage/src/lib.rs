//! Storage layer for Nightfall
//!
//! This crate provides the persisted side of the color-mode engine: the
//! preference and effective-mode types, a key-value store with an in-memory
//! fallback, and a typed wrapper over the single preference key.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color_mode;
pub mod kv;
pub mod prefs;

pub use color_mode::{ColorModePreference, EffectiveMode};
pub use kv::{KvConfig, KvStore, StoreError};
pub use prefs::PreferenceStore;
