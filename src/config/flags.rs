//! Turning the requested command-line flags into one consistent action.
//!
//! Several flags imply others: `--setup` implies `--recreate`, `--python`
//! implies `--recreate`, `--recreate` implies `--create` and `--no-activate`
//! implies `--create`. `--test` only inspects an environment and cannot be
//! combined with anything that would create one or that suppresses
//! activation. The implications are applied in that fixed order, so the
//! conflict reported for a given combination is always the same.

use crate::core::error::{Result, VenvError};
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET: &str = "venv";

const TEST_WITH_CREATE: &str =
    "--test cannot be combined with --create/--recreate/--setup/--python/--no-activate";
const TEST_WITH_NO_ACTIVATE: &str = "--no-activate cannot be specified if --test is specified";

/// Flags as requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions {
    pub create: bool,
    pub recreate: bool,
    pub setup: bool,
    pub no_activate: bool,
    pub python: Option<String>,
    pub test: bool,
    pub target: PathBuf,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            create: false,
            recreate: false,
            setup: false,
            no_activate: false,
            python: None,
            test: false,
            target: PathBuf::from(DEFAULT_TARGET),
        }
    }
}

/// The action to perform, with every implication applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    create: bool,
    recreate: bool,
    setup: bool,
    activate: bool,
    test: bool,
    interpreter: String,
    target: PathBuf,
}

impl ResolvedConfig {
    pub fn create(&self) -> bool {
        self.create
    }

    pub fn recreate(&self) -> bool {
        self.recreate
    }

    pub fn setup(&self) -> bool {
        self.setup
    }

    pub fn activate(&self) -> bool {
        self.activate
    }

    pub fn test(&self) -> bool {
        self.test
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl From<&ResolvedConfig> for RawOptions {
    fn from(resolved: &ResolvedConfig) -> Self {
        Self {
            create: resolved.create,
            recreate: resolved.recreate,
            setup: resolved.setup,
            no_activate: !resolved.activate && !resolved.test,
            python: resolved.recreate.then(|| resolved.interpreter.clone()),
            test: resolved.test,
            target: resolved.target.clone(),
        }
    }
}

pub fn resolve(raw: &RawOptions, default_interpreter: &str) -> Result<ResolvedConfig> {
    let setup = raw.setup;
    let mut recreate = raw.recreate;
    let mut create = raw.create;
    let mut activate = !raw.no_activate;
    let test = raw.test;

    if setup {
        recreate = true;
    }

    let interpreter = match &raw.python {
        Some(python) => {
            recreate = true;
            python.clone()
        }
        None => default_interpreter.to_string(),
    };

    if recreate {
        create = true;
    }

    if !activate && !test {
        create = true;
    }

    if create && test {
        return Err(VenvError::ConfigConflict(TEST_WITH_CREATE.to_string()));
    }

    if test {
        if !activate {
            return Err(VenvError::ConfigConflict(TEST_WITH_NO_ACTIVATE.to_string()));
        }
        activate = false;
    }

    Ok(ResolvedConfig {
        create,
        recreate,
        setup,
        activate,
        test,
        interpreter,
        target: raw.target.clone(),
    })
}
