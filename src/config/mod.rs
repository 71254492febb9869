pub mod flags;
pub mod global;
pub mod schema;
pub mod validation;

pub use flags::{resolve, RawOptions, ResolvedConfig, DEFAULT_TARGET};
pub use global::GlobalConfigManager;
pub use schema::{GlobalConfig, ShellConfig, VirtualenvConfig};
pub use validation::validate_global_config;
