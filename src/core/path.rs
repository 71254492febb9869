use std::path::{Component, Path, PathBuf};

fn resolve_path(base_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base_dir.join(configured)
    }
}

/// Make `path` absolute against the current directory and fold `.` and `..`
/// components lexically. Symlinks are not resolved.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    Ok(normalize(&resolve_path(&current_dir, path)))
}

pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Parent of `path` as the user wrote it, `.` for a bare file name.
pub fn display_parent(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Append `suffix` to the final component of `path`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let base: PathBuf = path.components().collect();
    let mut raw = base.into_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}
