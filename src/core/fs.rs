use std::io;
use std::path::Path;

/// Whether anything, including a dangling symlink, occupies `path`.
pub fn path_occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Remove whatever occupies `path`. Directories are removed recursively,
/// symlinks are removed without following them. A missing path is not an
/// error.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}
