//! Token persistence
//!
//! The session never touches a concrete storage medium; it goes through
//! [`TokenStore`]. Two implementations ship: an in-memory map and a JSON
//! file for the CLI.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use thiserror::Error;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "spacevoice_token";

/// Key holding the read-only flag set by access-code redemption
pub const READ_ONLY_KEY: &str = "spacevoice_read_only";

/// Get/set/clear access to the persisted bearer token
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<(), StoreError>;

    fn read_only(&self) -> bool;

    fn set_read_only(&self, read_only: bool) -> Result<(), StoreError>;

    /// Remove the token and the read-only flag
    fn clear(&self) -> Result<(), StoreError>;
}

/// Token storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(TOKEN_KEY.to_string(), token.to_string());
        }
        store
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        f(&mut entries);
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.update(|e| {
            e.insert(TOKEN_KEY.to_string(), token.to_string());
        })
    }

    fn read_only(&self) -> bool {
        self.get(READ_ONLY_KEY).as_deref() == Some("true")
    }

    fn set_read_only(&self, read_only: bool) -> Result<(), StoreError> {
        self.update(|e| set_flag(e, read_only))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|e| {
            e.remove(TOKEN_KEY);
            e.remove(READ_ONLY_KEY);
        })
    }
}

/// Token store persisted as a flat JSON object on disk.
///
/// Every mutation rewrites the whole file through a temp file + rename.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), "Opened token store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        f(&mut entries);
        self.persist(&entries)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.update(|e| {
            e.insert(TOKEN_KEY.to_string(), token.to_string());
        })
    }

    fn read_only(&self) -> bool {
        self.get(READ_ONLY_KEY).as_deref() == Some("true")
    }

    fn set_read_only(&self, read_only: bool) -> Result<(), StoreError> {
        self.update(|e| set_flag(e, read_only))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|e| {
            e.remove(TOKEN_KEY);
            e.remove(READ_ONLY_KEY);
        })
    }
}

fn set_flag(entries: &mut HashMap<String, String>, on: bool) {
    if on {
        entries.insert(READ_ONLY_KEY.to_string(), "true".to_string());
    } else {
        entries.remove(READ_ONLY_KEY);
    }
}
