use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use hexlet_check::config::{self, Config};
use hexlet_check::docker::DockerCli;
use hexlet_check::pipeline::{Pipeline, RunParams};
use hexlet_check::remote::HttpTransport;
use hexlet_check::state::{ActionsStateStore, FileStateStore, StateStore};

#[derive(Parser)]
#[command(name = "hexlet-check", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, provision and check the submitted assignment
    Run {
        #[command(flatten)]
        common: CommonArgs,
        /// Directory the course environment is provisioned under
        #[arg(long, env = "INPUT_MOUNT_PATH")]
        mount_path: PathBuf,
    },
    /// Submit the result recorded by a previous `run`
    Report {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Echo container output and print full error chains
    #[arg(long, env = "INPUT_VERBOSE")]
    verbose: bool,
    #[arg(long, env = "INPUT_HEXLET_TOKEN", hide_env_values = true)]
    hexlet_token: String,
    #[arg(long, env = "INPUT_BASIC_SECRET", hide_env_values = true)]
    basic_secret: String,
    /// Learner project root, relative to the current directory
    #[arg(long, env = "ACTION_PROJECT_PATH")]
    project_path: Option<PathBuf>,
    /// Grading service host, e.g. `hexlet.io` or `localhost:3000`
    #[arg(long, env = "ACTION_API_HOST")]
    api_host: Option<String>,
    /// Where run state is kept when not running under a CI state file
    #[arg(long, env = "HEXLET_CHECK_STATE_DIR")]
    state_dir: Option<PathBuf>,
    #[arg(long, env = "GITHUB_RUN_ID", default_value = "local")]
    run_id: String,
}

impl CommonArgs {
    fn project_path(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("resolving current directory")?;
        Ok(match &self.project_path {
            Some(p) => cwd.join(p),
            None => cwd,
        })
    }

    fn config(&self, project_path: &std::path::Path) -> Result<Config> {
        let mut cfg = config::load(project_path)?;
        if let Some(host) = self.api_host.as_ref().filter(|h| !h.is_empty()) {
            cfg.api_host = host.clone();
        }
        Ok(cfg)
    }

    fn store(&self) -> Box<dyn StateStore> {
        if let Some(store) = ActionsStateStore::from_env() {
            return Box::new(store);
        }
        let dir = self
            .state_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("hexlet-check"));
        Box::new(FileStateStore::new(dir, &self.run_id))
    }

    fn transport(&self, cfg: &Config) -> Result<HttpTransport> {
        let timeout = Duration::from_secs(cfg.http_timeout);
        Ok(HttpTransport::new(
            &self.hexlet_token,
            &self.basic_secret,
            timeout,
        )?)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (common, is_run) = match &cli.cmd {
        Commands::Run { common, .. } => (common, true),
        Commands::Report { common } => (common, false),
    };
    let verbose = common.verbose;
    init_tracing(verbose);

    match execute(&cli.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if is_run {
                error!(
                    "The tests have failed. Examine what they have to say. Inhale deeply. Exhale. Fix the code."
                );
            }
            // Internal error chains only help when debugging the tool itself.
            if verbose {
                eprintln!("Error: {e:?}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::Run { common, mount_path } => {
            let project_path = common.project_path()?;
            let cfg = common.config(&project_path)?;
            let store = common.store();
            let transport = common.transport(&cfg)?;
            let runner = DockerCli::new();

            let params = RunParams {
                verbose: common.verbose,
                project_path,
                mount_path: mount_path.clone(),
            };
            let outcome = Pipeline::new(&runner, &transport, store.as_ref(), &cfg).run(&params)?;
            info!(?outcome, "run finished");
        }
        Commands::Report { common } => {
            let project_path = common.project_path()?;
            let cfg = common.config(&project_path)?;
            let store = common.store();
            let transport = common.transport(&cfg)?;
            let runner = DockerCli::new();

            let outcome = Pipeline::new(&runner, &transport, store.as_ref(), &cfg).report()?;
            info!(?outcome, "report finished");
        }
    }
    Ok(())
}
