use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

/// Assignment directory name → lesson slug, shipped inside the course image.
pub const MAPPING_FILE: &str = "mappingData.json";

/// Lesson slug → files that make up the assignment.
pub const FILES_MANIFEST: &str = "filesData.json";

/// Files that belong to one lesson's assignment, relative to the assignment
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesData {
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default)]
    pub test_files: Vec<String>,
}

/// Resolve the lesson name for an assignment directory via the course's
/// mapping file.
pub fn lesson_for_assignment(course_path: &Path, assignment_name: &str) -> Result<String> {
    let path = course_path.join(MAPPING_FILE);
    let mapping: HashMap<String, String> = read_json(&path)?;
    mapping
        .get(assignment_name)
        .cloned()
        .ok_or_else(|| CheckError::LessonNotMapped {
            assignment: assignment_name.to_string(),
            mapping: path,
        })
}

/// Look up the source/test file lists for a lesson.
pub fn files_for_lesson(course_path: &Path, lesson_slug: &str) -> Result<FilesData> {
    let path = course_path.join(FILES_MANIFEST);
    let mut manifest: HashMap<String, FilesData> = read_json(&path)?;
    manifest
        .remove(lesson_slug)
        .ok_or_else(|| CheckError::ManifestEntryMissing {
            lesson: lesson_slug.to_string(),
            manifest: path,
        })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| CheckError::json(path.display().to_string(), e))
}
