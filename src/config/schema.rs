use crate::shell::ShellKind;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub virtualenv: VirtualenvConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ShellConfig {
    #[serde(default)]
    pub kind: ShellKind,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VirtualenvConfig {
    /// External command that creates environments.
    #[serde(default = "default_command")]
    pub command: String,
    /// Interpreter used when `--python` is not given.
    #[serde(default = "default_python")]
    pub default_python: String,
    /// Shell command run inside the new environment for `--setup`.
    #[serde(default = "default_setup_command")]
    pub setup_command: String,
}

fn default_command() -> String {
    "virtualenv".to_string()
}

fn default_python() -> String {
    "python".to_string()
}

fn default_setup_command() -> String {
    "python setup.py develop".to_string()
}

impl Default for VirtualenvConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            default_python: default_python(),
            setup_command: default_setup_command(),
        }
    }
}
