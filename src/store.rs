//! Small persisted key/value store.
//!
//! Only the authentication flag survives a restart; everything else resets to
//! defaults. Values are strings so the file stays readable by hand.

use crate::constants::AUTH_KEY;
use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct KvStore {
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl KvStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "store opened");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets `key` and writes the whole store back to disk.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }

    /// Startup authentication. Anything but an explicit `"false"` counts as signed in.
    pub fn load_authenticated(&self) -> bool {
        self.get(AUTH_KEY) != Some("false")
    }

    pub fn save_authenticated(&mut self, authenticated: bool) -> Result<()> {
        self.set(AUTH_KEY, if authenticated { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_key_means_authenticated() {
        let store = KvStore::in_memory();
        assert!(store.load_authenticated());
    }

    #[test]
    fn test_only_false_signs_out() {
        let mut store = KvStore::in_memory();
        store.set(AUTH_KEY, "false").unwrap();
        assert!(!store.load_authenticated());
        store.set(AUTH_KEY, "nonsense").unwrap();
        assert!(store.load_authenticated());
    }

    #[test]
    fn test_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = KvStore::open(&path).unwrap();
        store.save_authenticated(false).unwrap();

        let reopened = KvStore::open(&path).unwrap();
        assert_eq!(reopened.get(AUTH_KEY), Some("false"));
        assert!(!reopened.load_authenticated());
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = KvStore::open(file.path()).unwrap();
        assert!(store.load_authenticated());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{not json").unwrap();
        assert!(matches!(
            KvStore::open(file.path()),
            Err(crate::error::TimorError::Json(_))
        ));
    }
}
