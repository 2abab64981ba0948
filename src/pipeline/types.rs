use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two kinds of check run against an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Test,
    Lint,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Test => "test",
            TaskKind::Lint => "lint",
        }
    }

    /// Word used in progress banners.
    pub fn action(&self) -> &'static str {
        match self {
            TaskKind::Test => "Testing",
            TaskKind::Lint => "Linting",
        }
    }

    /// The course Makefile target for this task.
    pub fn make_target(&self) -> String {
        format!("{}-current", self.as_str())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a check task did not pass. Kept on the task result so the run phase
/// can raise it after the result has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct TaskFailure {
    pub task: TaskKind,
    pub command: String,
    pub exit_code: Option<i32>,
    pub message: String,
}

/// Output and outcome of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTaskResult {
    /// Merged stdout and stderr, in arrival order.
    pub output: String,
    #[serde(rename = "passed")]
    pub success: bool,
    pub exception: Option<TaskFailure>,
}

impl CheckTaskResult {
    pub fn passed(output: String) -> Self {
        Self {
            output,
            success: true,
            exception: None,
        }
    }

    pub fn failed(output: String, failure: TaskFailure) -> Self {
        Self {
            output,
            success: false,
            exception: Some(failure),
        }
    }
}

/// Test and lint results for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckData {
    pub test_data: CheckTaskResult,
    pub lint_data: CheckTaskResult,
}

/// Persisted verdict. Starts as `Fail` and only becomes `Success` once the
/// tests have passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    #[default]
    Fail,
    Success,
}

impl CheckState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckState::Fail => "fail",
            CheckState::Success => "success",
        }
    }
}

impl FromStr for CheckState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(CheckState::Fail),
            "success" => Ok(CheckState::Success),
            other => Err(format!("unknown check state '{other}'")),
        }
    }
}

/// Everything a check container needs to know about the assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub course_path: PathBuf,
    pub assignment_path: PathBuf,
    /// Where the assignment is mounted inside the container.
    pub assignment_dist_path: String,
    pub lesson_name: String,
    pub assignment_name: String,
}

/// Inputs to the run phase.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub verbose: bool,
    /// Learner project root holding the submission marker.
    pub project_path: PathBuf,
    /// The course is provisioned into `<mount_path>/course`.
    pub mount_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No submission marker; nothing was checked.
    Skipped,
    Passed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The run phase never produced check data.
    NothingToReport,
    Submitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_targets_follow_task_kind() {
        assert_eq!(TaskKind::Test.make_target(), "test-current");
        assert_eq!(TaskKind::Lint.make_target(), "lint-current");
    }

    #[test]
    fn task_result_uses_passed_on_the_wire() {
        let result = CheckTaskResult::passed("ok\n".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["passed"], true);
        assert_eq!(json["output"], "ok\n");
        assert!(json["exception"].is_null());
    }

    #[test]
    fn check_data_survives_persistence() {
        let data = CheckData {
            test_data: CheckTaskResult::failed(
                "1 failed".into(),
                TaskFailure {
                    task: TaskKind::Test,
                    command: "docker compose run".into(),
                    exit_code: Some(2),
                    message: "boom".into(),
                },
            ),
            lint_data: CheckTaskResult::passed(String::new()),
        };
        let raw = serde_json::to_string(&data).unwrap();
        assert!(raw.contains("\"testData\""));
        assert!(raw.contains("\"exitCode\":2"));
        let back: CheckData = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn check_state_parses_persisted_text() {
        assert_eq!("fail".parse::<CheckState>(), Ok(CheckState::Fail));
        assert_eq!("success".parse::<CheckState>(), Ok(CheckState::Success));
        assert!("passed".parse::<CheckState>().is_err());
    }

    #[test]
    fn task_failure_displays_its_message() {
        let failure = TaskFailure {
            task: TaskKind::Lint,
            command: String::new(),
            exit_code: None,
            message: "lint exploded".into(),
        };
        assert_eq!(failure.to_string(), "lint exploded");
    }
}
