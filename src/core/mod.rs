pub mod backup;
pub mod error;
pub mod fs;
pub mod path;
pub mod process;
pub mod report;

pub use backup::{with_backup, BackupTransaction};
pub use error::{Result, VenvError};
pub use fs::{path_occupied, remove_path};
pub use path::{absolute_path, display_parent};
pub use process::ProcessExecutor;
