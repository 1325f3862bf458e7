//! Cross-platform filesystem wrapper.
//!
//! Everything that depends on POSIX attribute support lives here: the
//! capability query, reading and applying permission bits, creating symbolic
//! links and setting modification times. On platforms without POSIX
//! semantics the permission helpers are no-ops and symlink creation reports
//! `Unsupported`; callers are expected to consult [`posix_supported`] once per
//! operation and pick the plain-file behavior instead.

use crate::permissions::{self, PermissionSet};
use filetime::FileTime;
use std::io;
use std::path::Path;

/// Whether the current platform exposes POSIX permission bits and symlinks.
pub fn posix_supported() -> bool {
    cfg!(unix)
}

#[cfg(unix)]
/// Reads the permission-bit set of `path`, following symlinks.
pub fn read_permissions(path: &Path) -> io::Result<PermissionSet> {
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(path)?.permissions().mode();
    Ok(permissions::from_unix_mode(mode))
}

#[cfg(not(unix))]
/// Without POSIX support there is nothing to read.
pub fn read_permissions(_path: &Path) -> io::Result<PermissionSet> {
    Ok(PermissionSet::new())
}

#[cfg(unix)]
/// Applies exactly the given permission bits to `path`.
pub fn set_permissions(path: &Path, perms: &PermissionSet) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = permissions::to_unix_mode(perms);
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
/// No-op: POSIX permission bits are not preserved.
pub fn set_permissions(_path: &Path, _perms: &PermissionSet) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
pub fn symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("symbolic links are not supported here: {}", link.display()),
    ))
}

/// Removes whatever non-directory entry exists at `path`, without following symlinks.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Sets the modification time of `path` from milliseconds since the unix epoch.
pub fn set_modified_millis(path: &Path, millis: i64) -> io::Result<()> {
    let secs = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) * 1_000_000) as u32;
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, nanos))
}
