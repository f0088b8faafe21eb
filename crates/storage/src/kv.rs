//! Key-value store for persisted settings
//!
//! A sled-backed store with JSON-encoded values. When the persistence medium
//! cannot be opened (sandboxed, quota-exceeded, path unwritable) the store
//! degrades to a process-local in-memory map for the rest of the session;
//! callers keep working and nothing is fatal.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None for immediate flush)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "nightfall_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

enum Backend {
    Disk(sled::Db),
    Memory(RwLock<HashMap<String, Vec<u8>>>),
}

/// Key-value store implementation
pub struct KvStore {
    backend: Backend,
}

impl KvStore {
    /// Open a durable store at the configured path
    pub fn open(config: KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression)
            .flush_every_ms(config.flush_every_ms)
            .open()?;

        Ok(Self { backend: Backend::Disk(db) })
    }

    /// Open a durable store, falling back to an in-memory one
    ///
    /// The fallback is the recoverable path for an unavailable persistence
    /// medium: values survive for the session only.
    pub fn open_or_memory(config: KvConfig) -> Self {
        match Self::open(config) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Persistence unavailable, using in-memory settings: {}", e);
                Self::in_memory()
            }
        }
    }

    /// Create an in-memory key-value store
    pub fn in_memory() -> Self {
        Self { backend: Backend::Memory(RwLock::new(HashMap::new())) }
    }

    /// Whether this store lost its persistence medium
    pub fn is_in_memory(&self) -> bool {
        matches!(self.backend, Backend::Memory(_))
    }

    /// Get a value by key
    ///
    /// An absent key is `Ok(None)`, not an error.
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let bytes = match &self.backend {
            Backend::Disk(db) => db.get(key.as_bytes())?.map(|ivec| ivec.to_vec()),
            Backend::Memory(map) => map.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned(),
        };

        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value by key
    pub fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        match &self.backend {
            Backend::Disk(db) => {
                db.insert(key.as_bytes(), bytes)?;
            }
            Backend::Memory(map) => {
                map.write().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), bytes);
            }
        }
        Ok(())
    }

    /// Remove a value by key
    pub fn remove(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Disk(db) => Ok(db.remove(key.as_bytes())?.is_some()),
            Backend::Memory(map) => {
                Ok(map.write().unwrap_or_else(|e| e.into_inner()).remove(key).is_some())
            }
        }
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Disk(db) => Ok(db.contains_key(key.as_bytes())?),
            Backend::Memory(map) => Ok(map.read().unwrap_or_else(|e| e.into_inner()).contains_key(key)),
        }
    }

    /// Flush pending writes to disk
    ///
    /// A no-op for in-memory stores. Transitions do not call this; it exists
    /// for hosts that want a stronger guarantee before exiting.
    pub fn flush(&self) -> Result<()> {
        if let Backend::Disk(db) = &self.backend {
            db.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disk_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = KvConfig::new(temp_dir.path().join("kv").to_string_lossy());
        let store = KvStore::open(config).unwrap();

        store.set("greeting", &"hello".to_string()).unwrap();
        let value: Option<String> = store.get("greeting").unwrap();
        assert_eq!(value, Some("hello".to_string()));
        assert!(!store.is_in_memory());
    }

    #[test]
    fn test_absent_key_is_none() {
        let store = KvStore::in_memory();
        let value: Option<String> = store.get("missing").unwrap();
        assert_eq!(value, None);
        assert!(!store.contains("missing").unwrap());
    }

    #[test]
    fn test_in_memory_set_get_remove() {
        let store = KvStore::in_memory();
        assert!(store.is_in_memory());

        store.set("count", &42u32).unwrap();
        assert_eq!(store.get::<u32>("count").unwrap(), Some(42));
        assert!(store.contains("count").unwrap());

        assert!(store.remove("count").unwrap());
        assert!(!store.remove("count").unwrap());
        assert_eq!(store.get::<u32>("count").unwrap(), None);
    }

    #[test]
    fn test_open_or_memory_falls_back_on_bad_path() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_directory");
        std::fs::write(&blocker, b"plain file").unwrap();

        let store = KvStore::open_or_memory(KvConfig::new(blocker.to_string_lossy()));
        assert!(store.is_in_memory());

        // Degraded store still works for the session
        store.set("k", &1u8).unwrap();
        assert_eq!(store.get::<u8>("k").unwrap(), Some(1));
        store.flush().unwrap();
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv").to_string_lossy().to_string();

        {
            let store = KvStore::open(KvConfig::new(&path)).unwrap();
            store.set("k", &"v".to_string()).unwrap();
            store.flush().unwrap();
        }

        let store = KvStore::open(KvConfig::new(&path)).unwrap();
        assert_eq!(store.get::<String>("k").unwrap(), Some("v".to_string()));
    }
}
