use crate::core::error::Result;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A shell script backed by an anonymous temporary file.
///
/// The file has no name on disk; it is reachable only through the
/// `/dev/fd/<n>` path of the descriptor held here. The descriptor survives
/// `exec` so that a child shell or a replacement process image can open it,
/// and the script's first line closes the inherited copy once the shell has
/// opened its own. Dropping the value releases the storage.
#[derive(Debug)]
pub struct StagedScript {
    file: File,
    path: PathBuf,
}

impl StagedScript {
    pub fn stage<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut file = tempfile::tempfile()?;
        let fd = file.as_raw_fd();

        writeln!(file, "exec {}<&-", fd)?;
        for line in lines {
            writeln!(file, "{}", line.as_ref())?;
        }
        file.flush()?;
        file.seek(SeekFrom::Start(0))?;

        set_inheritable(fd)?;

        let path = PathBuf::from(format!("/dev/fd/{}", fd));
        debug!("Staged script at {}", path.display());

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

fn set_inheritable(fd: RawFd) -> std::io::Result<()> {
    // SAFETY: fcntl on a descriptor owned by a live `File`; only the
    // close-on-exec flag is changed.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: as above.
    if unsafe { libc::fcntl(fd, libc::F_SETFD, flags & !libc::FD_CLOEXEC) } < 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}
