use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{StateKey, StateStore};
use crate::error::{CheckError, Result};

/// Keeps all keys of one run in `<dir>/<run_id>.json`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl AsRef<Path>, run_id: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{run_id}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| CheckError::json(self.path.display().to_string(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(CheckError::io(&self.path, e)),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CheckError::io(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| CheckError::json(self.path.display().to_string(), e))?;

        // Write-then-rename so a crash never leaves a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).map_err(|e| CheckError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CheckError::io(&self.path, e))
    }
}

impl StateStore for FileStateStore {
    fn save(&self, key: StateKey, value: &str) -> Result<()> {
        debug!(key = %key, path = %self.path.display(), "save state");
        let mut entries = self.load()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.store(&entries)
    }

    fn read(&self, key: StateKey) -> Result<Option<String>> {
        let mut entries = self.load()?;
        Ok(entries.remove(key.as_str()).filter(|v| !v.is_empty()))
    }

    fn clear(&self) -> Result<()> {
        debug!(path = %self.path.display(), "clear state");
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(CheckError::io(&self.path, e)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path(), "42");
        assert_eq!(store.read(StateKey::CheckData).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn later_save_overwrites_earlier_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path(), "42");
        store.save(StateKey::CheckState, "fail").unwrap();
        store.save(StateKey::CheckState, "success").unwrap();
        assert_eq!(
            store.read(StateKey::CheckState).unwrap().as_deref(),
            Some("success")
        );
    }

    #[test]
    fn survives_a_fresh_handle() {
        let dir = tempfile::tempdir().unwrap();
        FileStateStore::new(dir.path(), "7")
            .save(StateKey::AssignmentPath, "/project/course/lesson")
            .unwrap();

        let reopened = FileStateStore::new(dir.path(), "7");
        assert_eq!(
            reopened.read(StateKey::AssignmentPath).unwrap().as_deref(),
            Some("/project/course/lesson")
        );
    }

    #[test]
    fn runs_do_not_share_entries() {
        let dir = tempfile::tempdir().unwrap();
        FileStateStore::new(dir.path(), "1")
            .save(StateKey::CheckState, "fail")
            .unwrap();
        let other = FileStateStore::new(dir.path(), "2");
        assert_eq!(other.read(StateKey::CheckState).unwrap(), None);
    }

    #[test]
    fn creates_missing_state_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested/state"), "1");
        store.save(StateKey::CheckState, "fail").unwrap();
        assert!(store.path().is_file());
    }

    #[test]
    fn empty_value_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path(), "1");
        store.save(StateKey::CheckData, "").unwrap();
        assert_eq!(store.read(StateKey::CheckData).unwrap(), None);
    }

    #[test]
    fn clear_drops_every_key_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path(), "local");
        store.clear().unwrap();

        store.save(StateKey::CheckCreatePath, "https://x/check").unwrap();
        store.save(StateKey::CheckData, "{}").unwrap();
        store.clear().unwrap();

        assert!(!store.path().exists());
        assert_eq!(store.read(StateKey::CheckCreatePath).unwrap(), None);
        assert_eq!(store.read(StateKey::CheckData).unwrap(), None);
    }
}
