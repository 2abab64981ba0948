pub mod check;
pub mod commands;
pub mod provision;
mod report_phase;
mod run_phase;
mod types;

pub use run_phase::MARKER_FILE;
pub use types::{
    CheckData, CheckOptions, CheckState, CheckTaskResult, ReportOutcome, RunOutcome, RunParams,
    TaskFailure, TaskKind,
};

use crate::config::Config;
use crate::docker::CommandRunner;
use crate::remote::Transport;
use crate::state::StateStore;

/// The collaborators both phases work through. `run` lives in
/// `run_phase.rs`, `report` in `report_phase.rs`.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    transport: &'a dyn Transport,
    store: &'a dyn StateStore,
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        transport: &'a dyn Transport,
        store: &'a dyn StateStore,
        config: &'a Config,
    ) -> Self {
        Self {
            runner,
            transport,
            store,
            config,
        }
    }
}
