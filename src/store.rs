//! State persistence port.
//!
//! The lifecycle manager talks to a [`StatePort`] rather than the
//! filesystem, so it can be exercised against an in-memory implementation.
//! The shipped implementation is a single JSON document, read and written
//! whole.

use crate::error::{Result, WatchError};
use crate::model::WatchFile;
use std::path::{Path, PathBuf};

/// Load/save port for the persisted entry collection.
pub trait StatePort {
    /// Read the whole state document. A missing document is not an error:
    /// it loads as an empty collection with built-in defaults.
    fn load(&self) -> Result<WatchFile>;

    /// Write the whole state document, replacing any previous content.
    fn save(&self, state: &WatchFile) -> Result<()>;
}

/// JSON-file-backed state document.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, message: impl Into<String>) -> WatchError {
        WatchError::persistence(self.path.display().to_string(), message)
    }
}

impl StatePort for JsonStateFile {
    fn load(&self) -> Result<WatchFile> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WatchFile::default());
            }
            Err(e) => return Err(self.persistence_error(e.to_string())),
        };

        serde_json::from_str(&data).map_err(|e| self.persistence_error(e.to_string()))
    }

    fn save(&self, state: &WatchFile) -> Result<()> {
        let data = serde_json::to_string_pretty(state)
            .map_err(|e| self.persistence_error(e.to_string()))?;
        std::fs::write(&self.path, data).map_err(|e| self.persistence_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitEntry, MonitoredEntry, NotifyConfig};

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonStateFile::new(dir.path().join("watch.json"));
        let state = store.load().unwrap();
        assert!(state.entries.is_empty());
        assert_eq!(state.notify, NotifyConfig::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonStateFile::new(dir.path().join("watch.json"));

        let mut state = WatchFile::default();
        state.entries.push(MonitoredEntry::Commit(CommitEntry {
            url: "https://github.com/acme/widget".into(),
            owner: "acme".into(),
            repo: "widget".into(),
            branch: "main".into(),
            last_commit: "abc123".into(),
            note: Some("release branch".into()),
        }));
        state.notify.username = "custom name".into();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].url(), "https://github.com/acme/widget");
        assert_eq!(loaded.notify.username, "custom name");
    }

    #[test]
    fn test_save_writes_pretty_json() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("watch.json");
        let store = JsonStateFile::new(&path);
        store.save(&WatchFile::default()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"entries\""), "expected indented output: {raw}");
    }

    #[test]
    fn test_load_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("watch.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStateFile::new(&path).load().unwrap_err();
        assert!(matches!(err, WatchError::Persistence { .. }));
        assert!(err.to_string().contains("watch.json"));
    }
}
