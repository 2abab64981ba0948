// Course coordinates and the JSON manifests shipped with a course.

pub mod contents;
pub mod identity;
pub mod manifest;

pub use contents::{AssignmentContents, gather};
pub use identity::{AssignmentIdentity, CourseData, Locale, image_name};
pub use manifest::{FilesData, files_for_lesson, lesson_for_assignment};
