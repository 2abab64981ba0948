mod types;

pub use types::Config;

use std::path::Path;

use anyhow::{Context, Result};

/// Optional per-project settings file.
pub const CONFIG_FILE: &str = ".hexlet-check.yml";

/// Load `.hexlet-check.yml` from `dir`, falling back to defaults when the
/// file is absent. Missing keys take their default values.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
