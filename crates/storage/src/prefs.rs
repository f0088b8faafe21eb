//! Typed access to the persisted color-mode preference
//!
//! The persisted layout is one key holding one JSON string: `"light"`,
//! `"dark"`, or `"system"`. An absent key means the user never chose a mode;
//! it is treated as unset, not as an error. The mode controller only ever
//! writes concrete light/dark values here; a host settings surface may write
//! `system` to re-enable OS tracking, which bootstrap resolves on next start.

use std::sync::Arc;

use crate::color_mode::ColorModePreference;
use crate::kv::{KvConfig, KvStore, Result};

/// Storage key holding the color-mode preference
pub const COLOR_MODE_KEY: &str = "color-mode";

/// Typed wrapper over the single preference key
#[derive(Clone)]
pub struct PreferenceStore {
    kv: Arc<KvStore>,
}

impl PreferenceStore {
    /// Create a preference store over an existing key-value store
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Open a durable preference store, degrading to in-memory on failure
    pub fn open_or_memory(config: KvConfig) -> Self {
        Self::new(Arc::new(KvStore::open_or_memory(config)))
    }

    /// Create an in-memory preference store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(KvStore::in_memory()))
    }

    /// Read the stored preference, if the user has ever chosen one
    pub fn get(&self) -> Result<Option<ColorModePreference>> {
        self.kv.get(COLOR_MODE_KEY)
    }

    /// Persist a preference
    pub fn set(&self, preference: ColorModePreference) -> Result<()> {
        self.kv.set(COLOR_MODE_KEY, &preference)
    }

    /// Remove the stored preference, returning to the unset state
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(COLOR_MODE_KEY)?;
        Ok(())
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.kv.flush()
    }

    /// Whether this store lost its persistence medium
    pub fn is_in_memory(&self) -> bool {
        self.kv.is_in_memory()
    }
}
