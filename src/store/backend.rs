//! Durable key/value persistence for serialized entity collections
//!
//! Each entity collection lives under a stable key; the payload is a JSON
//! array of entity objects. Timestamp fields are stored as RFC 3339 strings
//! and rehydrated to `chrono` values by serde on every read.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Collection keys. One serialized array per key.
pub mod keys {
    pub const BOOKS: &str = "books";
    pub const NOTES: &str = "notes";
    pub const FOLDERS: &str = "folders";
    pub const COLLECTIONS: &str = "collections";
    pub const SAVED_FILTERS: &str = "saved_filters";
    pub const REVIEW_SESSIONS: &str = "review_sessions";
    pub const ACTIVITY: &str = "activity";
    pub const READING_GOALS: &str = "reading_goals";
}

/// Storage for serialized collections.
///
/// Access is single-writer and synchronous: the store performs
/// read-modify-write sequences with no locking, so two processes (or two
/// stores) sharing the same backing data can lose updates to each other.
pub trait Backend {
    /// Read the payload stored under `key`, if any
    fn read(&self, key: &str) -> Option<String>;

    /// Replace the payload stored under `key`
    fn write(&self, key: &str, payload: &str) -> io::Result<()>;
}

/// File-per-collection backend: `<base>/<key>.json`
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    pub fn new(base_path: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Default data directory (e.g. ~/.local/share/margin)
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("margin"))
    }

    fn file(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file(key)).ok()
    }

    fn write(&self, key: &str, payload: &str) -> io::Result<()> {
        fs::write(self.file(key), payload)
    }
}

/// In-memory backend for tests and throwaway stores
#[derive(Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, payload: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
