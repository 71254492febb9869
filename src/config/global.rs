use crate::config::schema::GlobalConfig;
use crate::config::validate_global_config;
use crate::core::error::Result;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const GLOBAL_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "VENV_CLI_CONFIG";

pub struct GlobalConfigManager {
    config_path: PathBuf,
}

impl GlobalConfigManager {
    /// Locate the configuration file, honouring `VENV_CLI_CONFIG`.
    pub fn new() -> Self {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::from_path(PathBuf::from(path)),
            _ => Self::from_path(Self::get_config_dir().join(GLOBAL_CONFIG_FILE)),
        }
    }

    pub fn from_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    fn get_config_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "venv-cli") {
            proj_dirs.config_dir().to_path_buf()
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".venv-cli")
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration. A missing file yields the defaults.
    pub async fn load(&self) -> Result<GlobalConfig> {
        if !self.config_path.exists() {
            debug!("No configuration at {}, using defaults", self.config_path.display());
            return Ok(GlobalConfig::default());
        }

        debug!("Loading configuration from {}", self.config_path.display());
        let content = fs::read_to_string(&self.config_path).await?;
        let config: GlobalConfig = toml::from_str(&content)?;
        validate_global_config(&config)?;
        Ok(config)
    }
}

impl Default for GlobalConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
