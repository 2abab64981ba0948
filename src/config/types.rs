use serde::{Deserialize, Serialize};

use crate::routes::DEFAULT_API_HOST;

/// Project-level settings, read from `.hexlet-check.yml` and overridden by
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry namespace the course checking images are published under.
    pub container_namespace: String,
    pub api_host: String,
    /// Compose file inside the provisioned course directory.
    pub compose_file: String,
    /// Compose service that runs `make` targets.
    pub compose_service: String,
    /// Per-request timeout for the grading service, in seconds.
    pub http_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_namespace: "hexletprograms".to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            compose_file: "docker-compose.yml".to_string(),
            compose_service: "project".to_string(),
            http_timeout: 60,
        }
    }
}
