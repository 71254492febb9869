use crate::core::error::{Result, VenvError};
use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Run a command with the caller's stdio and wait for it. The child is
    /// killed if the returned future is dropped before it exits.
    pub async fn run_inherited<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<ExitStatus> {
        let rendered = render_command(program, args);
        debug!("Running {}", rendered);

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| VenvError::CommandFailed(format!("{}: {}", rendered, e)))?;

        debug!("{} exited with {}", rendered, status);
        Ok(status)
    }

    /// Run a command and fail unless it exits successfully.
    pub async fn run_checked<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<()> {
        let status = Self::run_inherited(program, args).await?;

        if !status.success() {
            return Err(VenvError::CommandFailed(format!(
                "Error running command: {}",
                render_command(program, args)
            )));
        }

        Ok(())
    }

    /// Run a command and collect both output streams.
    pub async fn capture<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<CapturedOutput> {
        let rendered = render_command(program, args);
        debug!("Capturing {}", rendered);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| VenvError::CommandFailed(format!("{}: {}", rendered, e)))?;

        Ok(CapturedOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

pub fn render_command<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(AsRef::as_ref))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_program_and_args() {
        let rendered = render_command(OsStr::new("virtualenv"), &["--python", "python3", "venv"]);
        assert_eq!(rendered, "virtualenv --python python3 venv");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_collects_both_streams() {
        let output = ProcessExecutor::capture(
            OsStr::new("/bin/sh"),
            &["-c", "echo out; echo err >&2"],
        )
        .await
        .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_checked_rejects_nonzero_exit() {
        let err = ProcessExecutor::run_checked(OsStr::new("/bin/sh"), &["-c", "exit 3"])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Error running command: /bin/sh -c exit 3"));
    }
}
