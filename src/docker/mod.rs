// Docker invocation: command description and streaming output capture.

pub mod run;
pub mod types;

pub use run::DockerCli;
pub use types::{CommandRunner, ContainerCommand, ContainerResult, ExecError, OutputLine};
