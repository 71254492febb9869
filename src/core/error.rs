use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VenvError {
    #[error("{0}")]
    ConfigConflict(String),

    #[error("{0}")]
    TargetInvalid(String),

    #[error("{} is not a virtualenv.", .0.display())]
    NotAnEnvironment(PathBuf),

    #[error("{} does not exist.", .0.display())]
    PathMissing(PathBuf),

    #[error("Creating virtualenv failed: {0}")]
    CreationFailed(String),

    #[error("Failed to start shell: {0}")]
    ShellLaunchFailed(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation interrupted.")]
    Interrupted,

    #[error("Removing temporary path {} failed: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Restoring {} failed, manual cleanup may be required: {source}", path.display())]
    Rollback {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl VenvError {
    /// Exit status reported to the calling shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            VenvError::Interrupted => 2,
            _ => 1,
        }
    }

    /// Errors raised while undoing a failed swap. The target may be left in
    /// neither its original nor its new state.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, VenvError::Rollback { .. })
    }
}

pub type Result<T> = std::result::Result<T, VenvError>;
