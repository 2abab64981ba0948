//! Key/value state handed from the run phase to the report phase.
//!
//! The two phases are separate processes, so every value goes through a
//! [`StateStore`] as text. A key that was never written reads back as `None`,
//! which callers treat as "the pipeline never reached this stage".

mod actions;
mod file;

pub use actions::ActionsStateStore;
pub use file::FileStateStore;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CheckError, Result};

/// Names of the values persisted between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    CheckCreatePath,
    CheckState,
    FilesData,
    AssignmentPath,
    CheckData,
}

impl StateKey {
    #[cfg(test)]
    pub(crate) const ALL: [StateKey; 5] = [
        StateKey::CheckCreatePath,
        StateKey::CheckState,
        StateKey::FilesData,
        StateKey::AssignmentPath,
        StateKey::CheckData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::CheckCreatePath => "checkCreatePath",
            StateKey::CheckState => "checkState",
            StateKey::FilesData => "filesData",
            StateKey::AssignmentPath => "assignmentPath",
            StateKey::CheckData => "checkData",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage scoped to one pipeline execution that survives across processes.
pub trait StateStore {
    fn save(&self, key: StateKey, value: &str) -> Result<()>;

    /// `None` when the key was never written (or was written empty).
    fn read(&self, key: StateKey) -> Result<Option<String>>;

    /// Forget everything saved so far. A fresh run starts here and a report
    /// consumes the run's values, so nothing leaks into a later run.
    fn clear(&self) -> Result<()>;
}

pub fn save_json<T: Serialize>(store: &dyn StateStore, key: StateKey, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| CheckError::json(key.as_str(), e))?;
    store.save(key, &raw)
}

pub fn read_json<T: DeserializeOwned>(store: &dyn StateStore, key: StateKey) -> Result<Option<T>> {
    match store.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CheckError::json(key.as_str(), e)),
        None => Ok(None),
    }
}
