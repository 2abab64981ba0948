use std::path::Path;

use crate::config::Config;
use crate::docker::ContainerCommand;

use super::types::{CheckOptions, TaskKind};

/// Where course images keep the official course content.
pub const IMAGE_COURSE_DIR: &str = "/project/course";

/// Build a `docker version` probe that fails when the daemon is unreachable.
pub fn version_command() -> ContainerCommand {
    ContainerCommand::new(["version", "--format", "{{.Server.Version}}"])
}

/// Build a `docker pull` for the checking image.
pub fn pull_command(image: &str) -> ContainerCommand {
    ContainerCommand::new(["pull", image])
}

/// Build a throwaway `docker run` that copies the image's course content
/// into `course_path`.
pub fn copy_course_command(image: &str, course_path: &Path) -> ContainerCommand {
    ContainerCommand::new([
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:/mnt/course", course_path.display()),
        image.to_string(),
        "bash".to_string(),
        "-c".to_string(),
        format!("cp -r {IMAGE_COURSE_DIR}/. /mnt/course"),
    ])
}

/// Build a `docker tag` giving the image a local name.
pub fn tag_command(image: &str, local_name: &str) -> ContainerCommand {
    ContainerCommand::new(["tag", image, local_name])
}

/// Image names compose may resolve for the service in `course_path`.
///
/// Compose v1 joins project and service with `_`, v2 with `-`; hosted
/// runners have shipped both.
pub fn local_image_names(cfg: &Config, course_path: &Path) -> [String; 2] {
    let dir_name = course_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    [
        format!("{dir_name}_{}", cfg.compose_service),
        format!("{dir_name}-{}", cfg.compose_service),
    ]
}

/// Build the `make setup` run inside the provisioned course.
pub fn setup_command(cfg: &Config, course_path: &Path) -> ContainerCommand {
    let mut args = compose_run_args(cfg);
    args.extend([
        "-v".to_string(),
        format!("{}:{IMAGE_COURSE_DIR}", course_path.display()),
        cfg.compose_service.clone(),
        "make".to_string(),
        "setup".to_string(),
    ]);
    ContainerCommand::new(args).in_dir(course_path)
}

/// Build the `make <task>-current` run for one assignment, with the learner's
/// directory mounted over the lesson's assignment.
pub fn task_command(cfg: &Config, task: TaskKind, opts: &CheckOptions) -> ContainerCommand {
    let mut args = compose_run_args(cfg);
    args.extend([
        "-v".to_string(),
        format!(
            "{}:{}",
            opts.assignment_path.display(),
            opts.assignment_dist_path
        ),
        cfg.compose_service.clone(),
        "make".to_string(),
        task.make_target(),
        format!("ASSIGNMENT={}", opts.lesson_name),
    ]);
    ContainerCommand::new(args)
        .in_dir(&opts.course_path)
        .echo(true)
}

fn compose_run_args(cfg: &Config) -> Vec<String> {
    vec![
        "compose".into(),
        "-f".into(),
        cfg.compose_file.clone(),
        "run".into(),
        "--rm".into(),
    ]
}
