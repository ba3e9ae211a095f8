//! Filesystem primitives for the three disposal strategies

use crate::{Result, SweepError};
use rand::RngCore;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size of each block of random data written while shredding
const SHRED_CHUNK: usize = 64 * 1024;

/// Remove a file (or a symlink, never its target)
pub(crate) fn delete(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| io_error(path, e))
}

/// Overwrite a file's bytes in place with random data, flush it to disk,
/// then remove it
///
/// Symlinks are refused so that nothing outside the walked tree is ever
/// written to. Returns the number of bytes overwritten.
pub(crate) fn shred(path: &Path) -> Result<u64> {
    shred_file(path).map_err(|e| io_error(path, e))
}

fn shred_file(path: &Path) -> io::Result<u64> {
    if fs::symlink_metadata(path)?.file_type().is_symlink() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "refusing to shred through a symlink",
        ));
    }

    let mut file = OpenOptions::new().write(true).open(path)?;
    let len = file.metadata()?.len();

    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; SHRED_CHUNK];
    let mut remaining = len;

    while remaining > 0 {
        let n = remaining.min(SHRED_CHUNK as u64) as usize;
        rng.fill_bytes(&mut buf[..n]);
        file.write_all(&buf[..n])?;
        remaining -= n as u64;
    }

    file.sync_all()?;
    drop(file);

    fs::remove_file(path)?;
    Ok(len)
}

/// Move a file into `trash`, keeping its base name
///
/// A same-named file already in the trash is replaced. When the trash lives
/// on another filesystem the file is copied and the original removed.
pub(crate) fn move_to_trash(path: &Path, trash: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io_error(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let dest = trash.join(name);

    match fs::rename(path, &dest) {
        Ok(()) => Ok(dest),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(path, &dest).map_err(|e| io_error(path, e))?;
            fs::remove_file(path).map_err(|e| io_error(path, e))?;
            Ok(dest)
        }
        Err(e) => Err(io_error(path, e)),
    }
}

/// Whether an I/O error means the entry is already gone
pub(crate) fn is_vanished(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

fn io_error(path: &Path, source: io::Error) -> SweepError {
    SweepError::Io {
        path: path.to_path_buf(),
        source,
    }
}
