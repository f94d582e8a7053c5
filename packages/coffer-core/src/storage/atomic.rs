//! Whole-file writes through a temp file in the target directory.
//!
//! A reader sees either the previous file or the complete new one, never a
//! partial write.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

fn write_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::StorageWriteError(format!("{}: {}", path.display(), err))
}

fn stage(path: &Path, bytes: &[u8], mode: u32) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_error(dir, e))?;
    tmp.write_all(bytes).map_err(|e| write_error(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_error(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(mode))
            .map_err(|e| write_error(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(tmp)
}

/// Write `bytes` to `path`, replacing any existing file
///
/// `mode` sets the Unix permission bits and is ignored elsewhere.
pub fn write_atomic(path: &Path, bytes: &[u8], mode: u32) -> Result<()> {
    stage(path, bytes, mode)?
        .persist(path)
        .map_err(|e| write_error(path, e.error))?;
    Ok(())
}

/// Write `bytes` to `path` only if nothing is there yet
///
/// Returns `Ok(false)` when `path` already exists.
pub fn write_new(path: &Path, bytes: &[u8], mode: u32) -> Result<bool> {
    match stage(path, bytes, mode)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_error(path, e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/file.txt");

        write_atomic(&path, b"first", 0o644).unwrap();
        write_atomic(&path, b"second", 0o644).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_new_never_clobbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");

        assert!(write_new(&path, b"first", 0o644).unwrap());
        assert!(!write_new(&path, b"second", 0o644).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        write_new(&path, b"x", 0o644).unwrap();
        write_new(&path, b"y", 0o644).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
