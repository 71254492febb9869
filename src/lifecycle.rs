//! Deciding between testing, creating and activating an environment, and
//! running those steps in order.
//!
//! Creation always finishes, including any rollback, before activation is
//! considered, and a failed creation ends the run. Activation is never
//! performed here: it comes back as [`Outcome::Activate`] for the caller to
//! execute as its very last step.

use crate::config::{GlobalConfig, ResolvedConfig};
use crate::core::error::{Result, VenvError};
use crate::core::path::{absolute_path, display_parent};
use crate::python::{CreateOptions, EnvState, Virtualenv};
use crate::shell::ShellHandoff;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub enum Outcome {
    /// Nothing left to do.
    Finished,
    /// `--test` found a usable environment.
    Tested { path: PathBuf, version: String },
    /// Replace this process with a shell running inside the environment.
    Activate {
        path: PathBuf,
        version: String,
        handoff: ShellHandoff,
    },
}

pub struct Lifecycle {
    config: GlobalConfig,
}

impl Lifecycle {
    pub fn new(config: GlobalConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, resolved: &ResolvedConfig) -> Result<Outcome> {
        let venv = Virtualenv::new(resolved.target());

        if resolved.test() {
            return self.test(&venv).await;
        }

        let prompt = validate_target(resolved.target())?;

        if resolved.create() {
            self.create(&venv, resolved, &prompt).await?;
        }

        if resolved.activate() {
            return self.activate(&venv).await;
        }

        Ok(Outcome::Finished)
    }

    async fn test(&self, venv: &Virtualenv) -> Result<Outcome> {
        match venv.probe().await? {
            EnvState::Valid(version) => Ok(Outcome::Tested {
                path: venv.path().to_path_buf(),
                version,
            }),
            EnvState::Invalid => Err(VenvError::NotAnEnvironment(venv.path().to_path_buf())),
            EnvState::Absent => Err(VenvError::PathMissing(venv.path().to_path_buf())),
        }
    }

    async fn create(&self, venv: &Virtualenv, resolved: &ResolvedConfig, prompt: &str) -> Result<()> {
        // Only the layout matters here; a broken interpreter must not block --recreate.
        if venv.is_virtualenv() {
            if !resolved.recreate() {
                debug!("{} is already a virtualenv", venv.path().display());
                return Ok(());
            }
        } else if venv.path_exists() {
            return Err(VenvError::NotAnEnvironment(venv.path().to_path_buf()));
        }

        let settings = &self.config.virtualenv;
        let options = CreateOptions {
            command: &settings.command,
            python: resolved.interpreter(),
            prompt,
            setup_command: resolved.setup().then_some(settings.setup_command.as_str()),
            shell: self.config.shell.kind,
        };

        venv.create(&options).await
    }

    async fn activate(&self, venv: &Virtualenv) -> Result<Outcome> {
        let version = match venv.probe().await? {
            EnvState::Valid(version) => version,
            EnvState::Invalid => {
                return Err(VenvError::NotAnEnvironment(venv.path().to_path_buf()))
            }
            EnvState::Absent => return Err(VenvError::PathMissing(venv.path().to_path_buf())),
        };

        let shell = self.config.shell.kind;
        let handoff = ShellHandoff::new(shell, shell.activation_rc(&venv.activate_path()));

        Ok(Outcome::Activate {
            path: venv.path().to_path_buf(),
            version,
            handoff,
        })
    }
}

/// Check that the target's parent is an existing directory and derive the
/// environment prompt from the parent's name.
fn validate_target(target: &Path) -> Result<String> {
    let absolute = absolute_path(target)?;
    let parent = absolute.parent().unwrap_or(&absolute);

    if !parent.exists() {
        return Err(VenvError::TargetInvalid(format!(
            "Parent {} does not exist.",
            display_parent(target).display()
        )));
    }

    if !parent.is_dir() {
        return Err(VenvError::TargetInvalid(format!(
            "Parent {} is not a directory.",
            display_parent(target).display()
        )));
    }

    let name = parent
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(format!("({}) ", name))
}
