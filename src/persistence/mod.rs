//! Raw storage for the leaderboard
//!
//! Stores only move opaque JSON text around; parsing lives with the data
//! types that own the format.

use core::fmt;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Failure at the storage boundary
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage I/O failed: {err}"),
            Self::Parse(err) => write!(f, "stored data is malformed: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Somewhere a serialized leaderboard can live
pub trait ScoreStore {
    /// Stored text, or `None` if nothing was ever saved
    fn load_raw(&self) -> Result<Option<String>, StorageError>;
    fn save_raw(&mut self, data: &str) -> Result<(), StorageError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load_raw(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_raw(&mut self, data: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Write-then-rename so a crash never leaves a half-written board
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and inspect what a session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Rc::new(RefCell::new(Some(data.into()))),
        }
    }

    /// Current contents
    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load_raw(&self) -> Result<Option<String>, StorageError> {
        Ok(self.data.borrow().clone())
    }

    fn save_raw(&mut self, data: &str) -> Result<(), StorageError> {
        *self.data.borrow_mut() = Some(data.to_string());
        Ok(())
    }
}
