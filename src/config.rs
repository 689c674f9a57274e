//! Runtime configuration resolved from command-line flags and the environment.

use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::storage::{JsonFileStorage, MemoryStorage, TaskStorage, STORAGE_KEY};

/// Directory under `$HOME` holding the task file and the UI log.
pub const APP_DIR: &str = ".taskboard";
pub const LOG_FILE: &str = "taskboard.log";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Where tasks live and how loudly to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub ephemeral: bool,
    pub log_level: String,
}

impl Config {
    /// Resolve from an explicit `--db` path or `$HOME/.taskboard/tasks.json`.
    pub fn resolve(db: Option<PathBuf>, ephemeral: bool, log_level: Option<String>) -> Self {
        let db_path = db.unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            default_db_path(Path::new(&home))
        });
        Config {
            db_path,
            ephemeral,
            log_level: log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Directory containing the task file.
    pub fn data_dir(&self) -> &Path {
        self.db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// The UI log file. Ephemeral sessions log to the temp dir instead of
    /// creating the data directory.
    pub fn log_path(&self) -> PathBuf {
        if self.ephemeral {
            std::env::temp_dir().join(LOG_FILE)
        } else {
            self.data_dir().join(LOG_FILE)
        }
    }

    /// Create the data directory when tasks are written to disk.
    pub fn ensure_data_dir(&self) -> Result<(), PersistenceError> {
        if !self.ephemeral {
            std::fs::create_dir_all(self.data_dir())?;
        }
        Ok(())
    }

    /// The storage backend this configuration selects.
    pub fn storage(&self) -> Box<dyn TaskStorage> {
        if self.ephemeral {
            Box::new(MemoryStorage::new())
        } else {
            Box::new(JsonFileStorage::new(&self.db_path))
        }
    }
}

/// `<home>/.taskboard/tasks.json`
pub fn default_db_path(home: &Path) -> PathBuf {
    home.join(APP_DIR).join(format!("{STORAGE_KEY}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_db_path_wins() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/x/mine.json")), false, None);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x/mine.json"));
        assert_eq!(config.data_dir(), Path::new("/tmp/x"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/x/taskboard.log"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        let config = Config::resolve(Some(PathBuf::from("tasks.json")), false, Some("debug".into()));
        assert_eq!(config.data_dir(), Path::new("."));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn default_path_layout() {
        assert_eq!(
            default_db_path(Path::new("/home/u")),
            PathBuf::from("/home/u/.taskboard/tasks.json")
        );
    }

    #[test]
    fn ephemeral_storage_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("sub/tasks.json");
        let config = Config::resolve(Some(db.clone()), true, None);
        config.ensure_data_dir().unwrap();
        let mut storage = config.storage();
        storage.save(&[]).unwrap();
        assert!(!db.exists());
        assert!(!dir.path().join("sub").exists());
        assert_eq!(config.log_path(), std::env::temp_dir().join(LOG_FILE));
    }
}
