//! Filesystem helpers for tool installation.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Whether a file has any executable permission bit set.
pub fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Whether a file exists with zero size.
///
/// Third-party tool binaries cannot be redistributed, so upstream ships an
/// empty placeholder the operator is expected to replace. A zero-size
/// artifact means "not supplied yet", never "install this".
pub fn file_is_empty(path: &Path) -> Result<bool> {
    Ok(fs::metadata(path)?.len() == 0)
}

/// Mark a file executable (0o755).
pub fn make_executable(path: &Path) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// Create a symlink at `dst` pointing to `src`, replacing any existing
/// file or link at `dst`.
pub fn symlink_replace(src: &Path, dst: &Path) -> Result<()> {
    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    std::os::unix::fs::symlink(src, dst)?;
    debug!(src = %src.display(), dst = %dst.display(), "created symlink");
    Ok(())
}

/// Remove a symlink, tolerating its absence.
pub fn remove_symlink(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed symlink");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("placeholder");
        fs::write(&path, b"").unwrap();
        assert!(file_is_empty(&path).unwrap());
    }

    #[test]
    fn nonempty_file_is_not_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("artifact");
        fs::write(&path, b"binary").unwrap();
        assert!(!file_is_empty(&path).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(file_is_empty(Path::new("/nonexistent/artifact")).is_err());
    }

    #[test]
    fn make_executable_sets_mode_bits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        assert!(!is_executable(&path) || cfg!(not(unix)));
        make_executable(&path).unwrap();
        assert!(is_executable(&path));
    }

    #[test]
    fn symlink_replace_overwrites_existing_link() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, b"1").unwrap();
        fs::write(&second, b"2").unwrap();
        let link = dir.path().join("tool");

        symlink_replace(&first, &link).unwrap();
        symlink_replace(&second, &link).unwrap();
        assert_eq!(fs::read_link(&link).unwrap(), second);
    }

    #[test]
    fn remove_symlink_tolerates_absence() {
        let dir = TempDir::new().unwrap();
        assert!(remove_symlink(&dir.path().join("never-created")).is_ok());
    }

    #[test]
    fn remove_symlink_removes_existing_link() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        fs::write(&target, b"x").unwrap();
        let link = dir.path().join("link");
        symlink_replace(&target, &link).unwrap();
        remove_symlink(&link).unwrap();
        assert!(!link.exists());
    }
}
