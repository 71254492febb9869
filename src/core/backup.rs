//! Replace whatever occupies a path as a single all-or-nothing step.
//!
//! A [`BackupTransaction`] moves the current occupant of a path aside when it
//! starts. Committing deletes that backup; anything else (an explicit
//! rollback, an error, or the transaction being dropped because its future
//! was cancelled) puts the backup back and discards whatever was created in
//! the meantime.

use crate::core::error::{Result, VenvError};
use crate::core::fs::{path_occupied, remove_path};
use crate::core::path::with_suffix;
use crate::core::report;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

pub const BACKUP_SUFFIX: &str = "~venv_cli_backup";
pub const DELETE_SUFFIX: &str = "~venv_cli_delete";

#[derive(Debug)]
pub struct BackupTransaction {
    path: PathBuf,
    backup_path: PathBuf,
    delete_path: PathBuf,
    resolved: bool,
}

impl BackupTransaction {
    pub fn begin(path: &Path) -> Result<Self> {
        let path: PathBuf = path.components().collect();
        let backup_path = with_suffix(&path, BACKUP_SUFFIX);
        let delete_path = with_suffix(&path, DELETE_SUFFIX);

        remove_stale(&backup_path)?;
        remove_stale(&delete_path)?;

        if path_occupied(&path) {
            debug!("Moving {} to {}", path.display(), backup_path.display());
            std::fs::rename(&path, &backup_path)?;
        }

        Ok(Self {
            path,
            backup_path,
            delete_path,
            resolved: false,
        })
    }

    /// Keep the new content and drop the backup.
    pub fn commit(mut self) -> Result<()> {
        self.resolved = true;

        if path_occupied(&self.backup_path) {
            debug!("Discarding backup {}", self.backup_path.display());
            remove_path(&self.backup_path).map_err(|source| VenvError::Cleanup {
                path: self.backup_path.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Discard the new content and put the backup back in place.
    pub fn rollback(mut self) -> Result<()> {
        self.resolved = true;
        self.restore()
    }

    fn restore(&self) -> Result<()> {
        if path_occupied(&self.path) {
            debug!("Moving {} to {}", self.path.display(), self.delete_path.display());
            std::fs::rename(&self.path, &self.delete_path).map_err(|source| {
                VenvError::Rollback {
                    path: self.path.clone(),
                    source,
                }
            })?;
        }

        if path_occupied(&self.backup_path) {
            debug!("Restoring {} from {}", self.path.display(), self.backup_path.display());
            std::fs::rename(&self.backup_path, &self.path).map_err(|source| {
                VenvError::Rollback {
                    path: self.backup_path.clone(),
                    source,
                }
            })?;
        }

        remove_path(&self.delete_path).map_err(|source| VenvError::Rollback {
            path: self.delete_path.clone(),
            source,
        })
    }
}

impl Drop for BackupTransaction {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }

        warn!("Rolling back unfinished changes to {}", self.path.display());
        if let Err(e) = self.restore() {
            error!("Rollback of {} failed: {}", self.path.display(), e);
            report::fatal(&e);
        }
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    if path_occupied(path) {
        warn!("Removing leftover {}", path.display());
        remove_path(path).map_err(|source| VenvError::Cleanup {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Run `operation` with the current occupant of `path` moved aside.
///
/// On success the backup is deleted. On failure the original occupant is
/// restored and the operation's error is returned unchanged, unless the
/// restore itself fails.
pub async fn with_backup<T, F, Fut>(path: &Path, operation: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let transaction = BackupTransaction::begin(path)?;

    match operation().await {
        Ok(value) => {
            transaction.commit()?;
            Ok(value)
        }
        Err(e) => {
            debug!("Operation on {} failed: {}", path.display(), e);
            if let Err(rollback_error) = transaction.rollback() {
                error!("Rollback after failure ({}) did not complete", e);
                return Err(rollback_error);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn populate(path: &Path, marker: &str) {
        fs::create_dir_all(path).unwrap();
        fs::write(path.join(marker), marker).unwrap();
    }

    fn leftovers(path: &Path) -> bool {
        path_occupied(&with_suffix(path, BACKUP_SUFFIX))
            || path_occupied(&with_suffix(path, DELETE_SUFFIX))
    }

    #[tokio::test]
    async fn success_replaces_content_and_drops_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        populate(&target, "old");

        let result = with_backup(&target, || async {
            assert!(!path_occupied(&target));
            assert!(with_suffix(&target, BACKUP_SUFFIX).join("old").exists());
            populate(&target, "new");
            Ok(7)
        })
        .await
        .unwrap();

        assert_eq!(result, 7);
        assert!(target.join("new").exists());
        assert!(!target.join("old").exists());
        assert!(!leftovers(&target));
    }

    #[tokio::test]
    async fn failure_restores_original_and_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        populate(&target, "old");

        let err = with_backup(&target, || async {
            populate(&target, "partial");
            Err::<(), _>(VenvError::CreationFailed("no such python".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, VenvError::CreationFailed(_)));
        assert!(target.join("old").exists());
        assert!(!target.join("partial").exists());
        assert!(!leftovers(&target));
    }

    #[tokio::test]
    async fn failure_on_empty_path_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");

        let _ = with_backup(&target, || async {
            populate(&target, "partial");
            Err::<(), _>(VenvError::Interrupted)
        })
        .await;

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn dropping_unresolved_transaction_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        populate(&target, "old");

        let transaction = BackupTransaction::begin(&target).unwrap();
        populate(&target, "partial");
        drop(transaction);

        assert!(target.join("old").exists());
        assert!(!target.join("partial").exists());
        assert!(!leftovers(&target));
    }

    #[tokio::test]
    async fn cancelled_operation_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        populate(&target, "old");

        let swap = with_backup(&target, || async {
            populate(&target, "partial");
            std::future::pending::<Result<()>>().await
        });
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(50), swap).await;

        assert!(timed_out.is_err());
        assert!(target.join("old").exists());
        assert!(!target.join("partial").exists());
        assert!(!leftovers(&target));
    }

    #[test]
    fn begin_removes_stale_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        populate(&with_suffix(&target, BACKUP_SUFFIX), "stale");
        fs::write(with_suffix(&target, DELETE_SUFFIX), "stale").unwrap();

        let transaction = BackupTransaction::begin(&target).unwrap();
        assert!(!leftovers(&target));
        transaction.commit().unwrap();
    }

    #[test]
    fn plain_files_are_backed_up_too() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("venv");
        fs::write(&target, "original").unwrap();

        let transaction = BackupTransaction::begin(&target).unwrap();
        assert_eq!(
            fs::read_to_string(&transaction.backup_path).unwrap(),
            "original"
        );
        populate(&target, "partial");
        transaction.rollback().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }
}
