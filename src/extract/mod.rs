//! # Extraction Module
//!
//! Reads a zip container produced by [`crate::archive`] (or any zip with unix
//! metadata) and recreates its entries below a destination directory.
//! Entries are processed in stored order. Every entry passes the
//! [`PathGuard`] first; the first entry that would land outside the
//! destination aborts the whole extraction.

pub mod path_guard;

pub use path_guard::PathGuard;

use crate::common::mtime;
use crate::common::{EntryInfo, EntryKind};
use crate::error::ArchiverError;
use crate::fsx;
use crate::permissions::{self, PERMISSION_MASK};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::read::ZipFile;
use zip::ZipArchive;

/// Restores archive entries onto disk.
///
/// POSIX support is queried once on construction; without it permission bits
/// are not applied and symlink entries are written as plain files holding the
/// link target text.
#[derive(Debug, Clone)]
pub struct Extractor {
    posix: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self { posix: fsx::posix_supported() }
    }

    /// Overrides the platform's POSIX capability.
    pub fn posix_attributes(mut self, enabled: bool) -> Self {
        self.posix = enabled;
        self
    }

    /// Extracts every entry of `archive` below `dest`, creating `dest` if needed.
    ///
    /// Nothing is rolled back on failure; the destination should be treated as
    /// unusable when an error is returned.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ArchiverError> {
        let file = File::open(archive).map_err(ArchiverError::io(archive))?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;

        fs::create_dir_all(dest).map_err(ArchiverError::io(dest))?;
        let guard = PathGuard::new(dest)?;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            let name = entry.name().to_string();
            let target = guard.resolve(&name)?;
            self.extract_entry(&mut entry, &name, &target, &guard)?;
        }

        info!(archive = %archive.display(), dest = %dest.display(), entries = zip.len(), "archive extracted");
        Ok(())
    }

    fn extract_entry(
        &self,
        entry: &mut ZipFile<'_>,
        name: &str,
        target: &Path,
        guard: &PathGuard,
    ) -> Result<(), ArchiverError> {
        let kind = entry_kind(entry);
        if kind == EntryKind::Directory {
            guard.create_dir_all(target, name)?;
        } else {
            if let Some(parent) = target.parent() {
                guard.create_dir_all(parent, name)?;
            }
            match kind {
                EntryKind::Symlink if self.posix => {
                    let link_target = read_link_target(entry, target)?;
                    fsx::remove_if_exists(target).map_err(ArchiverError::io(target))?;
                    fsx::symlink(&link_target, target).map_err(ArchiverError::io(target))?;
                    debug!(entry = name, target = %link_target.display(), "restored symlink");
                    return Ok(());
                }
                EntryKind::Symlink => {
                    warn!(entry = name, "symbolic links unsupported, writing link target as a regular file");
                    write_payload(entry, target)?;
                    return Ok(());
                }
                _ => {
                    let written = write_payload(entry, target)?;
                    debug!(entry = name, bytes = written, "restored file");
                }
            }
        }

        if let Some(millis) = modified_millis(entry) {
            fsx::set_modified_millis(target, millis).map_err(ArchiverError::io(target))?;
        }
        if self.posix {
            if let Some(mode) = entry.unix_mode() {
                fsx::set_permissions(target, &permissions::from_unix_mode(mode))
                    .map_err(ArchiverError::io(target))?;
            }
        }
        Ok(())
    }
}

/// Extracts `archive` into `dest` using the platform's capabilities.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<(), ArchiverError> {
    Extractor::new().extract(archive, dest)
}

/// Lists entry metadata without extracting anything.
pub fn list_entries(archive: &Path) -> Result<Vec<EntryInfo>, ArchiverError> {
    let file = File::open(archive).map_err(ArchiverError::io(archive))?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let mut entries = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index(index)?;
        entries.push(EntryInfo {
            path: entry.name().to_string(),
            kind: entry_kind(&entry),
            mode: entry.unix_mode().map(|mode| mode & PERMISSION_MASK),
            size: entry.size(),
            modified_millis: modified_millis(&entry),
        });
    }
    Ok(entries)
}

fn entry_kind(entry: &ZipFile<'_>) -> EntryKind {
    if entry.is_dir() {
        EntryKind::Directory
    } else if entry.unix_mode().map_or(false, permissions::is_symlink_mode) {
        EntryKind::Symlink
    } else {
        EntryKind::File
    }
}

fn modified_millis(entry: &ZipFile<'_>) -> Option<i64> {
    mtime::parse_ntfs_modified(entry.extra_data()).or_else(|| mtime::from_dos_time(entry.last_modified()))
}

fn read_link_target(entry: &mut ZipFile<'_>, target: &Path) -> Result<PathBuf, ArchiverError> {
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw).map_err(ArchiverError::io(target))?;
    let text = String::from_utf8(raw).map_err(|_| ArchiverError::NonUtf8Path(target.to_path_buf()))?;
    Ok(PathBuf::from(text))
}

/// Replaces whatever is at `target` with the entry payload.
fn write_payload(entry: &mut ZipFile<'_>, target: &Path) -> Result<u64, ArchiverError> {
    fsx::remove_if_exists(target).map_err(ArchiverError::io(target))?;
    let mut out = File::create(target).map_err(ArchiverError::io(target))?;
    io::copy(entry, &mut out).map_err(ArchiverError::io(target))
}
