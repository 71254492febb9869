pub mod script;

pub use script::StagedScript;

use crate::core::error::{Result, VenvError};
use crate::core::process::ProcessExecutor;
use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::os::unix::process::CommandExt;
use std::path::Path;
use tracing::debug;

/// Interactive shells a session can be handed off to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    #[default]
    Bash,
}

impl ShellKind {
    pub fn program(&self) -> &'static str {
        match self {
            ShellKind::Bash => "bash",
        }
    }

    /// The user's own startup file, sourced before the environment is activated.
    pub fn startup_file(&self) -> &'static str {
        match self {
            ShellKind::Bash => "~/.bashrc",
        }
    }

    fn interactive_args(&self, rc_file: &Path) -> Vec<OsString> {
        match self {
            ShellKind::Bash => vec![
                OsString::from("--rcfile"),
                rc_file.as_os_str().to_os_string(),
                OsString::from("-i"),
            ],
        }
    }

    /// Quote `value` so it is taken literally by the shell.
    pub fn quote(&self, value: &str) -> String {
        match self {
            ShellKind::Bash => format!("'{}'", value.replace('\'', r"'\''")),
        }
    }

    /// Startup commands for an interactive session with `activate_script` sourced.
    pub fn activation_rc(&self, activate_script: &Path) -> Vec<String> {
        let startup = self.startup_file();
        vec![
            format!("[ -e {startup} ] && . {startup}"),
            format!(
                ". {} || exit $?",
                self.quote(&activate_script.to_string_lossy())
            ),
        ]
    }

    /// A script running `command` with `activate_script` sourced, stopping at the first failure.
    pub fn activated_command(&self, activate_script: &Path, command: &str) -> Vec<String> {
        vec![
            "set -e".to_string(),
            format!(". {}", self.quote(&activate_script.to_string_lossy())),
            command.to_string(),
        ]
    }

    /// Run `lines` as a script in a child shell and wait for it.
    pub async fn run_script(&self, lines: &[String]) -> Result<()> {
        let script = StagedScript::stage(lines)?;
        ProcessExecutor::run_checked(
            OsStr::new(self.program()),
            &[script.path().as_os_str()],
        )
        .await
    }
}

/// Replacement of this process by an interactive shell.
///
/// Built by the lifecycle as its final action; [`ShellHandoff::exec`] must
/// be the last thing the program does, since no code after a successful
/// exec runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellHandoff {
    shell: ShellKind,
    rc_lines: Vec<String>,
}

impl ShellHandoff {
    pub fn new(shell: ShellKind, rc_lines: Vec<String>) -> Self {
        Self { shell, rc_lines }
    }

    #[cfg(test)]
    pub(crate) fn shell(&self) -> ShellKind {
        self.shell
    }

    #[cfg(test)]
    pub(crate) fn rc_lines(&self) -> &[String] {
        &self.rc_lines
    }

    /// Replace the current process image. Only returns on failure.
    ///
    /// Descriptors other than stdio and the staged rc file are expected to be
    /// close-on-exec already, as everything std and tokio open is.
    pub fn exec(self) -> VenvError {
        let program_name = self.shell.program();
        let program = match which::which(program_name) {
            Ok(program) => program,
            Err(e) => {
                return VenvError::ShellLaunchFailed(format!("{}: {}", program_name, e));
            }
        };

        let script = match StagedScript::stage(&self.rc_lines) {
            Ok(script) => script,
            Err(e) => return e,
        };

        debug!("Executing {} with rc file {}", program.display(), script.path().display());
        let err = std::process::Command::new(&program)
            .arg0(program_name)
            .args(self.shell.interactive_args(script.path()))
            .exec();

        drop(script);
        VenvError::ShellLaunchFailed(format!("{}: {}", program.display(), err))
    }
}
