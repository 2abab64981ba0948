use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::course;
use crate::docker::CommandRunner;
use crate::error::Result;

use super::commands::{IMAGE_COURSE_DIR, task_command};
use super::types::{CheckData, CheckOptions, CheckTaskResult, TaskFailure, TaskKind};

/// Run one task for the assignment. Never fails: a failing or unstartable
/// container is recorded in the result instead.
pub fn run_task(
    runner: &dyn CommandRunner,
    cfg: &Config,
    task: TaskKind,
    opts: &CheckOptions,
) -> CheckTaskResult {
    let action = task.action();
    let name = &opts.assignment_name;
    let cmd = task_command(cfg, task, opts);

    info!("{action} assignment \"{name}\" started.");

    let (output, error, exit_code) = match runner.run(&cmd) {
        Ok(finished) => {
            let exit_code = finished.exit_code;
            let output = finished.log.clone();
            (output, finished.ensure_success(&cmd).err(), exit_code)
        }
        Err(e) => (String::new(), Some(e), None),
    };

    let result = match error {
        None => {
            info!("{action} assignment \"{name}\" completed successfully.");
            CheckTaskResult::passed(output)
        }
        Some(e) => {
            info!("{action} assignment \"{name}\" completed with errors.");
            let failure = TaskFailure {
                task,
                command: cmd.to_string(),
                exit_code,
                message: e.to_string(),
            };
            CheckTaskResult::failed(output, failure)
        }
    };

    info!("{}", "─".repeat(40));
    result
}

/// Resolve the lesson for `assignment_path`, then test and lint it, strictly
/// one after the other.
pub fn check_assignment(
    runner: &dyn CommandRunner,
    cfg: &Config,
    assignment_path: &Path,
    course_path: &Path,
) -> Result<CheckData> {
    let assignment_name = assignment_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let lesson_name = course::lesson_for_assignment(course_path, &assignment_name)?;

    let opts = CheckOptions {
        course_path: course_path.to_path_buf(),
        assignment_path: assignment_path.to_path_buf(),
        assignment_dist_path: format!("{IMAGE_COURSE_DIR}/{lesson_name}/assignment"),
        lesson_name,
        assignment_name,
    };

    let test_data = run_task(runner, cfg, TaskKind::Test, &opts);
    let lint_data = run_task(runner, cfg, TaskKind::Lint, &opts);

    Ok(CheckData {
        test_data,
        lint_data,
    })
}
