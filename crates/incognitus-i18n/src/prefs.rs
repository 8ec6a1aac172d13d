//! Preference stores standing in for the browser's `localStorage`.

use incognitus_core::{error::ClientError, traits::PrefStore};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`.
///
/// A missing file reads as empty; the parent directory is created on first
/// write.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePrefs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Storage(format!("corrupt prefs file {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ClientError::Storage(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl PrefStore for FilePrefs {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // A corrupt file is replaced rather than blocking every later write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let raw = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, raw).map_err(|e| {
            ClientError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-process scratch directory so concurrent test runs never share files.
    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "__incognitus_test_{name}_{}__",
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_prefs_round_trip() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.get("i18n_lang").unwrap(), None);
        prefs.set("i18n_lang", "ru").unwrap();
        assert_eq!(prefs.get("i18n_lang").unwrap().as_deref(), Some("ru"));
    }

    #[test]
    fn test_file_prefs_persist_across_instances() {
        let tmp = scratch_dir("prefs");
        let _ = std::fs::remove_dir_all(&tmp);
        let path = tmp.join("nested/prefs.json");

        FilePrefs::new(&path).set("i18n_lang", "fa").unwrap();
        let reopened = FilePrefs::new(&path);
        assert_eq!(reopened.get("i18n_lang").unwrap().as_deref(), Some("fa"));
        assert_eq!(reopened.get("other").unwrap(), None);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn test_file_prefs_corrupt_file_errors_on_read_and_heals_on_write() {
        let tmp = scratch_dir("prefs_corrupt");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let prefs = FilePrefs::new(&path);
        assert!(matches!(prefs.get("i18n_lang"), Err(ClientError::Storage(_))));
        prefs.set("i18n_lang", "uz").unwrap();
        assert_eq!(prefs.get("i18n_lang").unwrap().as_deref(), Some("uz"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
