use crate::config::{resolve, GlobalConfigManager, RawOptions, DEFAULT_TARGET};
use crate::core::error::Result;
use crate::core::report;
use crate::lifecycle::{Lifecycle, Outcome};
use crate::shell::ShellHandoff;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "venv",
    version,
    about = "Create, set up and/or activate a virtualenv within a newly started shell",
    long_about = None
)]
pub struct Cli {
    /// Create the virtualenv, unless one already exists at the path, before activating it
    #[arg(short, long)]
    pub create: bool,

    /// Remove an existing virtualenv before creating a new one (implies --create)
    #[arg(short, long)]
    pub recreate: bool,

    /// Run the setup command (`python setup.py develop`) after creating the virtualenv (implies --recreate)
    #[arg(short, long)]
    pub setup: bool,

    /// Do not activate the virtualenv (implies --create)
    #[arg(short = 'n', long)]
    pub no_activate: bool,

    /// Python interpreter to create the virtualenv with (default: `python`, implies --recreate)
    #[arg(short, long, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Only check whether the path is a virtualenv and report its interpreter version
    #[arg(short, long)]
    pub test: bool,

    /// Path of the virtualenv to operate on
    #[arg(default_value = DEFAULT_TARGET)]
    pub virtualenv: PathBuf,
}

impl From<Cli> for RawOptions {
    fn from(cli: Cli) -> Self {
        Self {
            create: cli.create,
            recreate: cli.recreate,
            setup: cli.setup,
            no_activate: cli.no_activate,
            python: cli.python,
            test: cli.test,
            target: cli.virtualenv,
        }
    }
}

/// Carry out everything up to, but not including, the shell handoff.
///
/// A returned handoff must be executed by the caller as its last action.
pub async fn run(cli: Cli) -> Result<Option<ShellHandoff>> {
    let config = GlobalConfigManager::new().load().await?;
    let resolved = resolve(&RawOptions::from(cli), &config.virtualenv.default_python)?;

    match Lifecycle::new(config).run(&resolved).await? {
        Outcome::Finished => Ok(None),

        Outcome::Tested { path, version } => {
            report::notice(format_args!(
                "{} is a virtualenv running {}.",
                path.display(),
                version
            ));
            Ok(None)
        }

        Outcome::Activate {
            path,
            version,
            handoff,
        } => {
            report::notice(format_args!(
                "Activating virtualenv {} running {}.",
                path.display(),
                version
            ));
            Ok(Some(handoff))
        }
    }
}
