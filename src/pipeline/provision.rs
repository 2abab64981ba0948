use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::docker::{CommandRunner, ContainerCommand};
use crate::error::{CheckError, Result};

use super::commands::{
    copy_course_command, local_image_names, pull_command, setup_command, tag_command,
    version_command,
};

/// Make the course content from `image` available in `course_path` and
/// prepare it with the course's own `make setup`.
///
/// Every step must succeed; the first failure aborts provisioning.
pub fn provision(
    runner: &dyn CommandRunner,
    cfg: &Config,
    course_path: &Path,
    image: &str,
    verbose: bool,
) -> Result<()> {
    info!(image, course = %course_path.display(), "preparing course environment");

    std::fs::create_dir_all(course_path).map_err(|e| CheckError::io(course_path, e))?;

    exec(runner, version_command(), false)?;
    exec(runner, pull_command(image), verbose)?;
    exec(runner, copy_course_command(image, course_path), verbose)?;
    for local_name in local_image_names(cfg, course_path) {
        exec(runner, tag_command(image, &local_name), verbose)?;
    }
    exec(runner, setup_command(cfg, course_path), verbose)?;

    debug!("course environment ready");
    Ok(())
}

fn exec(runner: &dyn CommandRunner, cmd: ContainerCommand, verbose: bool) -> Result<()> {
    let cmd = cmd.echo(verbose);
    runner.run(&cmd)?.ensure_success(&cmd)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::ExecError;
    use crate::pipeline::fake::FakeRunner;

    #[test]
    fn runs_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let course = dir.path().join("course");
        let runner = FakeRunner::default();

        provision(&runner, &Config::default(), &course, "ns/slug-ru:5", false).unwrap();

        assert!(course.is_dir());
        let verbs: Vec<String> = runner
            .commands()
            .iter()
            .map(|c| c.args[0].clone())
            .collect();
        assert_eq!(verbs, ["version", "pull", "run", "tag", "tag", "compose"]);

        let tags: Vec<String> = runner
            .commands()
            .iter()
            .filter(|c| c.args[0] == "tag")
            .map(|c| c.args[2].clone())
            .collect();
        assert_eq!(tags, ["course_project", "course-project"]);
    }

    #[test]
    fn verbose_echoes_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default();
        provision(&runner, &Config::default(), dir.path(), "img:1", true).unwrap();
        let commands = runner.commands();
        assert!(!commands[0].echo);
        assert!(commands[1..].iter().all(|c| c.echo));
    }

    #[test]
    fn failed_pull_stops_provisioning() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default().fail_when(|c| c.args[0] == "pull");

        let err = provision(&runner, &Config::default(), dir.path(), "img:1", false).unwrap_err();

        assert!(matches!(
            err,
            CheckError::Exec(ExecError::Failed { ref command, .. }) if command == "docker pull img:1"
        ));
        assert_eq!(runner.commands().len(), 2);
    }
}
