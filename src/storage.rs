//! Persistence adapters for the task collection.
//!
//! The whole collection is stored as one JSON array under a fixed key. A
//! backend only moves that text in and out; it never interprets tasks beyond
//! (de)serializing them, and it reports failures as values so the store can
//! decide what to do with them.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PersistenceError;
use crate::task::Task;

/// Fixed namespace key the collection is stored under.
pub const STORAGE_KEY: &str = "tasks";

/// A durable home for the serialized task collection.
pub trait TaskStorage {
    /// Read the stored collection. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Task>>, PersistenceError>;

    /// Replace the stored collection with `tasks`.
    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError>;
}

impl<S: TaskStorage + ?Sized> TaskStorage for Box<S> {
    fn load(&self) -> Result<Option<Vec<Task>>, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        (**self).save(tasks)
    }
}

/// Serialize a collection to its stored text form.
pub fn encode(tasks: &[Task]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parse the stored text form of a collection.
pub fn decode(text: &str) -> Result<Vec<Task>, PersistenceError> {
    Ok(serde_json::from_str(text)?)
}

/// JSON file backend. Writes go to a temp file that is renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    /// Store under the fixed key inside `dir` (`<dir>/tasks.json`).
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Task>>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let tasks = decode(&text)?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(Some(tasks))
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let data = encode(tasks)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// In-process key-value backend with an optional byte quota.
///
/// Holds the same serialized text a file would, so round trips exercise the
/// real encoding. Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose serialized size exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStorage {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Seed the stored text directly, bypassing encoding.
    pub fn with_raw(text: impl Into<String>) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(STORAGE_KEY.to_string(), text.into());
        storage
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(STORAGE_KEY).map(String::as_str)
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Task>>, PersistenceError> {
        self.raw().map(decode).transpose()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let data = encode(tasks)?;
        if let Some(quota) = self.quota {
            if data.len() > quota {
                return Err(PersistenceError::QuotaExceeded {
                    needed: data.len(),
                    quota,
                });
            }
        }
        self.entries.insert(STORAGE_KEY.to_string(), data);
        Ok(())
    }
}
