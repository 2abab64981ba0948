use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::course::{self, AssignmentIdentity};
use crate::error::{CheckError, Result};
use crate::remote;
use crate::routes::build_routes;
use crate::state::{self, StateKey};

use super::Pipeline;
use super::check::check_assignment;
use super::provision::provision;
use super::types::{CheckState, RunOutcome, RunParams, TaskFailure, TaskKind};

/// Submission marker written into the learner's project by the course CLI.
pub const MARKER_FILE: &str = ".current.json";

#[derive(Debug, Deserialize)]
struct Marker {
    assignment: String,
}

impl Pipeline<'_> {
    /// Validate, provision, check and persist the result for the submitted
    /// assignment.
    ///
    /// `checkState` is recorded as `fail` before any container work starts
    /// and only flipped to `success` after the tests pass, so a crash at any
    /// later point still leaves a reportable failure behind. Whatever an
    /// earlier run stored is dropped first.
    pub fn run(&self, params: &RunParams) -> Result<RunOutcome> {
        self.store.clear()?;

        let marker_path = params.project_path.join(MARKER_FILE);
        if !marker_path.exists() {
            info!(marker = %marker_path.display(), "no submitted assignment, nothing to check");
            return Ok(RunOutcome::Skipped);
        }

        let marker: Marker = course::manifest::read_json(&marker_path)?;
        let relative = marker.assignment;
        let assignment_path = params.project_path.join(&relative);
        if !assignment_path.exists() {
            return Err(CheckError::AssignmentMissing { path: relative });
        }

        let identity = AssignmentIdentity::parse(&relative)?;
        let course_data = identity.course();
        let routes = build_routes(
            &course_data.slug,
            &identity.lesson_slug,
            course_data.locale,
            &self.config.api_host,
        );

        debug!(url = %routes.check_validate_path, "validating assignment");
        let tag = remote::validate(self.transport, &routes.check_validate_path, &relative)?;
        let image = course::image_name(
            &self.config.container_namespace,
            &course_data.slug,
            course_data.locale,
            &tag,
        );

        self.store
            .save(StateKey::CheckCreatePath, &routes.check_create_path)?;
        self.store
            .save(StateKey::CheckState, CheckState::Fail.as_str())?;

        let course_path = course_path(&params.mount_path);
        provision(
            self.runner,
            self.config,
            &course_path,
            &image,
            params.verbose,
        )?;

        let files = course::files_for_lesson(&course_path, &identity.lesson_slug)?;
        state::save_json(self.store, StateKey::FilesData, &files)?;
        self.store
            .save(StateKey::AssignmentPath, &path_text(&assignment_path))?;

        let check_data = check_assignment(self.runner, self.config, &assignment_path, &course_path)?;
        state::save_json(self.store, StateKey::CheckData, &check_data)?;

        // Only the tests decide the outcome; lint results are informational.
        let test_data = check_data.test_data;
        if !test_data.success {
            let failure = test_data.exception.unwrap_or_else(|| TaskFailure {
                task: TaskKind::Test,
                command: String::new(),
                exit_code: None,
                message: "tests failed".to_string(),
            });
            return Err(failure.into());
        }

        self.store
            .save(StateKey::CheckState, CheckState::Success.as_str())?;
        Ok(RunOutcome::Passed)
    }
}

fn course_path(mount_path: &Path) -> PathBuf {
    mount_path.join("course")
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
