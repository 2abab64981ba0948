use std::path::PathBuf;

use thiserror::Error;

use crate::docker::ExecError;
use crate::pipeline::TaskFailure;

/// Every way a pipeline phase can fail.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Assignment by path {path} not found. Check if the path is correct.")]
    AssignmentMissing { path: String },

    #[error("Assignment '{path}' not found. Check the course and assignment directory names.")]
    AssignmentNotFound { path: String },

    #[error("Assignment path '{path}' must look like <course>/<lesson>")]
    InvalidAssignmentPath { path: String },

    #[error(
        "An unrecognized connection error has occurred. Please report to support.\n{details}"
    )]
    UnrecognizedResponse { details: String },

    #[error("Assignment directory '{assignment}' has no lesson in {}", .mapping.display())]
    LessonNotMapped { assignment: String, mapping: PathBuf },

    #[error("Lesson '{lesson}' has no entry in {}", .manifest.display())]
    ManifestEntryMissing { lesson: String, manifest: PathBuf },

    #[error(transparent)]
    Task(#[from] TaskFailure),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("state store error: {0}")]
    State(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = CheckError> = std::result::Result<T, E>;
