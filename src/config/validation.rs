use crate::config::schema::GlobalConfig;
use crate::core::error::{Result, VenvError};

pub fn validate_global_config(config: &GlobalConfig) -> Result<()> {
    if config.virtualenv.command.trim().is_empty() {
        return Err(VenvError::Config(
            "virtualenv.command cannot be empty".to_string(),
        ));
    }

    if config.virtualenv.default_python.trim().is_empty() {
        return Err(VenvError::Config(
            "virtualenv.default_python cannot be empty".to_string(),
        ));
    }

    if config.virtualenv.setup_command.trim().is_empty() {
        return Err(VenvError::Config(
            "virtualenv.setup_command cannot be empty".to_string(),
        ));
    }

    Ok(())
}
