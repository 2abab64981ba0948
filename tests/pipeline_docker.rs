//! Integration tests against a real Docker daemon.
//!
//! These require a running Docker daemon and are marked `#[ignore]`.
//! Run with: `cargo test -- --ignored`

use hexlet_check::docker::{CommandRunner, ContainerCommand, DockerCli, ExecError};
use hexlet_check::pipeline::commands::{pull_command, version_command};

const IMAGE: &str = "alpine:3.20";

#[test]
#[ignore]
fn daemon_answers_version_probe() {
    let result = DockerCli::new().run(&version_command()).unwrap();
    assert!(result.success(), "docker version failed: {}", result.log);
    assert!(!result.log.trim().is_empty());
}

#[test]
#[ignore]
fn container_output_merges_both_streams() {
    let cli = DockerCli::new();
    let pull = pull_command(IMAGE);
    cli.run(&pull).unwrap().ensure_success(&pull).unwrap();

    let cmd = ContainerCommand::new([
        "run",
        "--rm",
        IMAGE,
        "sh",
        "-c",
        "echo first; echo second 1>&2; exit 4",
    ]);
    let result = cli.run(&cmd).unwrap();

    assert_eq!(result.exit_code, Some(4));
    assert!(result.log.contains("first\n"));
    assert!(result.log.contains("second\n"));

    let err = result.ensure_success(&cmd).unwrap_err();
    assert!(matches!(err, ExecError::Failed { exit_code: Some(4), .. }));
}

#[test]
#[ignore]
fn pulling_unknown_image_fails() {
    let cmd = pull_command("hexletprograms/definitely-not-a-course:0");
    let result = DockerCli::new().run(&cmd).unwrap();
    assert!(!result.success());
}
