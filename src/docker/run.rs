use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use tracing::debug;

use super::types::{CommandRunner, ContainerCommand, ContainerResult, ExecError, OutputLine};

/// Runs commands through the local `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            program: "docker".into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for DockerCli {
    fn run(&self, cmd: &ContainerCommand) -> Result<ContainerResult, ExecError> {
        debug!(command = %cmd, cwd = ?cmd.cwd, "exec");

        let mut command = Command::new(&self.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            command: cmd.to_string(),
            source,
        })?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let (tx, rx) = mpsc::channel();
        let stdout_handle = forward_lines(stdout, tx.clone(), OutputLine::Stdout);
        let stderr_handle = forward_lines(stderr, tx, OutputLine::Stderr);

        // Both readers share one channel, so the log keeps arrival order
        // across the two streams.
        let mut log = String::new();
        for line in rx {
            let (OutputLine::Stdout(text) | OutputLine::Stderr(text)) = line;
            if cmd.echo {
                println!("{text}");
            }
            log.push_str(&text);
            log.push('\n');
        }

        let _ = stdout_handle.join();
        let _ = stderr_handle.join();

        let status = child.wait().map_err(|source| ExecError::Spawn {
            command: cmd.to_string(),
            source,
        })?;

        Ok(ContainerResult {
            exit_code: status.code(),
            log,
        })
    }
}

fn forward_lines<R>(
    stream: R,
    tx: Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                // Receiver may be dropped; ignore send errors.
                Ok(l) => {
                    let _ = tx.send(wrap(l));
                }
                Err(_) => break,
            }
        }
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_both_streams_and_exit_code() {
        let cli = DockerCli::with_program("sh");
        let cmd = ContainerCommand::new(["-c", "echo out; echo err 1>&2; exit 3"]);
        let result = cli.run(&cmd).unwrap();
        assert_eq!(result.exit_code, Some(3));
        assert!(result.log.contains("out\n"));
        assert!(result.log.contains("err\n"));
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cli = DockerCli::with_program("sh");
        let cmd = ContainerCommand::new(["-c", "pwd"]).in_dir(dir.path());
        let result = cli.run(&cmd).unwrap();
        assert!(result.success());
        let printed = std::path::PathBuf::from(result.log.trim());
        assert_eq!(
            printed.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let cli = DockerCli::with_program("definitely-not-a-real-binary-xyz");
        let err = cli.run(&ContainerCommand::new(["version"])).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
