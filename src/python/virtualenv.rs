use crate::core::backup::with_backup;
use crate::core::error::{Result, VenvError};
use crate::core::fs::path_occupied;
use crate::core::process::{render_command, ProcessExecutor};
use crate::shell::ShellKind;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What currently occupies a candidate environment path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvState {
    Absent,
    Invalid,
    /// A usable environment and the version string of its interpreter.
    Valid(String),
}

/// Parameters for creating an environment.
#[derive(Debug, Clone)]
pub struct CreateOptions<'a> {
    pub command: &'a str,
    pub python: &'a str,
    pub prompt: &'a str,
    /// Run inside the new environment after creation.
    pub setup_command: Option<&'a str>,
    pub shell: ShellKind,
}

#[derive(Debug, Clone)]
pub struct Virtualenv {
    path: PathBuf,
}

impl Virtualenv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bin_dir(&self) -> PathBuf {
        self.path.join("bin")
    }

    pub fn python_path(&self) -> PathBuf {
        self.bin_dir().join("python")
    }

    pub fn activate_path(&self) -> PathBuf {
        self.bin_dir().join("activate")
    }

    pub fn path_exists(&self) -> bool {
        path_occupied(&self.path)
    }

    pub fn is_virtualenv(&self) -> bool {
        self.python_path().is_file() && self.activate_path().is_file()
    }

    /// What `python --version` prints for the installed interpreter.
    pub async fn python_version_string(&self) -> Result<String> {
        let python = self.python_path();
        let output = ProcessExecutor::capture(python.as_os_str(), &["--version"]).await?;

        if !output.status.success() {
            return Err(VenvError::CommandFailed(format!(
                "Error running command: {} --version",
                python.display()
            )));
        }

        // Interpreters before 3.4 print the version on stderr.
        let stdout = output.stdout.trim();
        let version = if stdout.is_empty() {
            output.stderr.trim()
        } else {
            stdout
        };

        Ok(version.to_string())
    }

    pub async fn probe(&self) -> Result<EnvState> {
        if self.is_virtualenv() {
            Ok(EnvState::Valid(self.python_version_string().await?))
        } else if self.path_exists() {
            Ok(EnvState::Invalid)
        } else {
            Ok(EnvState::Absent)
        }
    }

    /// Create a fresh environment in place of whatever occupies the path.
    ///
    /// The previous occupant is only discarded once the creator and the
    /// optional setup command have both succeeded.
    pub async fn create(&self, options: &CreateOptions<'_>) -> Result<()> {
        let command = which::which(options.command).map_err(|e| {
            debug!("Looking up {} failed: {}", options.command, e);
            VenvError::CreationFailed(format!("{} is not installed", options.command))
        })?;

        with_backup(&self.path, || async {
            self.run_creator(&command, options).await?;

            if let Some(setup_command) = options.setup_command {
                self.run_setup(options.shell, setup_command).await?;
            }

            Ok(())
        })
        .await
    }

    async fn run_creator(&self, command: &Path, options: &CreateOptions<'_>) -> Result<()> {
        let args: Vec<OsString> = vec![
            "--python".into(),
            options.python.into(),
            "--prompt".into(),
            options.prompt.into(),
            self.path.as_os_str().to_os_string(),
        ];

        let status = ProcessExecutor::run_inherited(command.as_os_str(), &args)
            .await
            .map_err(into_creation_failure)?;

        if !status.success() {
            return Err(VenvError::CreationFailed(format!(
                "Error running command: {}",
                render_command(command.as_os_str(), &args)
            )));
        }

        Ok(())
    }

    async fn run_setup(&self, shell: ShellKind, setup_command: &str) -> Result<()> {
        debug!("Running `{}` in {}", setup_command, self.path.display());

        let lines = shell.activated_command(&self.activate_path(), setup_command);
        shell
            .run_script(&lines)
            .await
            .map_err(into_creation_failure)
    }
}

fn into_creation_failure(error: VenvError) -> VenvError {
    match error {
        VenvError::CreationFailed(message) | VenvError::CommandFailed(message) => {
            VenvError::CreationFailed(message)
        }
        other => VenvError::CreationFailed(other.to_string()),
    }
}
