//! Filesystem helpers: atomic writes and stale tmp-file cleanup.
//!
//! Both the checkpoint store and the downloader write to a `.tmp` sibling
//! first and rename into place, so a reader never observes a partially
//! written file under normal process termination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Path of the `.tmp` sibling used for staged writes.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Write `bytes` to `path` via tmp-file + rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Remove stale `.tmp` files under `dir`, recursively.
///
/// Missing directories are fine (nothing was downloaded yet).
pub fn cleanup_tmp_files(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            cleanup_tmp_files(&path)?;
        } else if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
