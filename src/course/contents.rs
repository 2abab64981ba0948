use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::manifest::FilesData;

/// Text of every manifest-listed file, keyed by its relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentContents {
    pub source_contents: BTreeMap<String, String>,
    pub test_contents: BTreeMap<String, String>,
}

/// Read the listed files from `assignment_path`.
///
/// Best effort: a file that is absent or unreadable contributes an empty
/// string instead of failing the report.
pub fn gather(assignment_path: &Path, files: &FilesData) -> AssignmentContents {
    AssignmentContents {
        source_contents: read_all(assignment_path, &files.source_files),
        test_contents: read_all(assignment_path, &files.test_files),
    }
}

fn read_all(root: &Path, relative: &[String]) -> BTreeMap<String, String> {
    relative
        .iter()
        .map(|rel| (rel.clone(), read_lossy(&root.join(rel))))
        .collect()
}

fn read_lossy(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "listed file is absent");
            String::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read listed file");
            String::new()
        }
    }
}
