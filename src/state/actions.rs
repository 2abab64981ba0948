use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{StateKey, StateStore};
use crate::error::{CheckError, Result};

/// State file written by the current step.
pub const STATE_FILE_VAR: &str = "GITHUB_STATE";
/// Prefix of the variables that expose saved state to the post step.
pub const STATE_VAR_PREFIX: &str = "STATE_";

/// The hosted CI runner's step state: values written to the `GITHUB_STATE`
/// file come back as `STATE_<name>` variables in the job's post step.
#[derive(Debug, Clone)]
pub struct ActionsStateStore {
    state_file: Option<PathBuf>,
    saved: HashMap<String, String>,
}

impl ActionsStateStore {
    pub fn new(state_file: Option<PathBuf>, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let saved = vars
            .into_iter()
            .filter_map(|(k, v)| k.strip_prefix(STATE_VAR_PREFIX).map(|name| (name.to_string(), v)))
            .collect();
        Self { state_file, saved }
    }

    /// `None` outside of a runner that provides `GITHUB_STATE`.
    pub fn from_env() -> Option<Self> {
        let state_file = std::env::var_os(STATE_FILE_VAR).map(PathBuf::from)?;
        Some(Self::new(Some(state_file), std::env::vars()))
    }
}

impl StateStore for ActionsStateStore {
    fn save(&self, key: StateKey, value: &str) -> Result<()> {
        let path = self
            .state_file
            .as_deref()
            .ok_or_else(|| CheckError::State(format!("{STATE_FILE_VAR} is not set")))?;
        append_record(path, key.as_str(), value)
    }

    fn read(&self, key: StateKey) -> Result<Option<String>> {
        Ok(self
            .saved
            .get(key.as_str())
            .filter(|v| !v.is_empty())
            .cloned())
    }

    // Runner state lives and dies with the job.
    fn clear(&self) -> Result<()> {
        Ok(())
    }
}

fn append_record(path: &Path, name: &str, value: &str) -> Result<()> {
    let delimiter = delimiter();
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(CheckError::State(format!(
            "value for '{name}' collides with delimiter {delimiter}"
        )));
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CheckError::io(path, e))?;
    write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n").map_err(|e| CheckError::io(path, e))
}

fn delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{nanos}", std::process::id())
}
