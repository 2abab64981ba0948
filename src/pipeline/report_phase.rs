use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::course::{self, AssignmentContents, FilesData};
use crate::error::{CheckError, Result};
use crate::remote;
use crate::state::{self, StateKey};

use super::Pipeline;
use super::types::{CheckData, CheckState, ReportOutcome};

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    check: Submission<'a>,
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    #[serde(flatten)]
    data: &'a CheckData,
    #[serde(flatten)]
    contents: &'a AssignmentContents,
    state: CheckState,
}

impl Pipeline<'_> {
    /// Submit whatever the run phase persisted. A run phase that never got
    /// as far as checking leaves nothing to report, which is not an error.
    ///
    /// The persisted values are consumed: a second report finds nothing.
    pub fn report(&self) -> Result<ReportOutcome> {
        let check_create_path = self.store.read(StateKey::CheckCreatePath)?;
        let check_data: Option<CheckData> = state::read_json(self.store, StateKey::CheckData)?;
        let (Some(check_create_path), Some(check_data)) = (check_create_path, check_data) else {
            self.store.clear()?;
            info!("The assignment checking hasn't started. No data to send.");
            return Ok(ReportOutcome::NothingToReport);
        };

        let check_state = match self.store.read(StateKey::CheckState)? {
            Some(raw) => raw.parse::<CheckState>().map_err(CheckError::State)?,
            None => CheckState::Fail,
        };
        let files: FilesData =
            state::read_json(self.store, StateKey::FilesData)?.unwrap_or_default();
        let assignment_path = self
            .store
            .read(StateKey::AssignmentPath)?
            .ok_or_else(|| CheckError::State(format!("{} was never saved", StateKey::AssignmentPath)))?;
        self.store.clear()?;

        let contents = course::gather(Path::new(&assignment_path), &files);
        let body = SubmitBody {
            check: Submission {
                data: &check_data,
                contents: &contents,
                state: check_state,
            },
        };
        let body = serde_json::to_value(&body).map_err(|e| CheckError::json("check submission", e))?;

        remote::submit(self.transport, &check_create_path, &body)?;

        info!("The result of the assignment checking has submitted successfully.");
        Ok(ReportOutcome::Submitted)
    }
}
