use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Describes a `docker` invocation. The `args` field is the full argument list
/// passed to `docker` (the pipeline layer is responsible for assembling it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCommand {
    pub args: Vec<String>,
    /// Working directory for the `docker` process itself.
    pub cwd: Option<PathBuf>,
    /// Echo output lines to stdout as they arrive.
    pub echo: bool,
}

impl ContainerCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            echo: false,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl fmt::Display for ContainerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("docker")?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of a finished `docker` process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerResult {
    pub exit_code: Option<i32>,
    /// Merged stdout and stderr, in arrival order.
    pub log: String,
}

impl ContainerResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into an [`ExecError::Failed`].
    pub fn ensure_success(self, cmd: &ContainerCommand) -> Result<String, ExecError> {
        if self.success() {
            Ok(self.log)
        } else {
            Err(ExecError::Failed {
                command: cmd.to_string(),
                exit_code: self.exit_code,
            })
        }
    }
}

/// Streamed output from a running container.
#[derive(Debug)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to invoke `{command}`: {source} (is docker installed and on PATH?)")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("the process '{command}' failed with exit code {}", code_text(.exit_code))]
    Failed {
        command: String,
        exit_code: Option<i32>,
    },
}

fn code_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Capability to execute a `docker` command and capture its output.
pub trait CommandRunner {
    fn run(&self, cmd: &ContainerCommand) -> Result<ContainerResult, ExecError>;
}
