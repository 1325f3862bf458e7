//! # Archive Creation
//!
//! Packs the files and symbolic links below a directory into a zip container.
//! Directories are traversed but never stored as entries of their own; each
//! entry carries its path relative to the archived root, its unix mode and
//! its modification time. Symbolic links are not followed: the link target
//! text becomes the entry payload.

use crate::common::mtime::{self, EntryTimes};
use crate::error::ArchiverError;
use crate::fsx;
use crate::permissions::{self, DEFAULT_LINK_PERM};
use globset::{Glob, GlobMatcher};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// The pattern that disables filtering altogether.
pub const MATCH_ALL: &str = "*";

/// File names that [`is_archive`] recognises.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".jar", ".zip", ".war", ".ear"];

/// Entries at or above this size need zip64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Filename filter applied to the base name of every visited file.
#[derive(Debug, Clone)]
pub enum FileFilter {
    All,
    Glob(GlobMatcher),
}

impl FileFilter {
    /// Compiles `pattern`; the literal `"*"` matches everything without a matcher.
    pub fn new(pattern: &str) -> Result<Self, ArchiverError> {
        if pattern == MATCH_ALL {
            return Ok(FileFilter::All);
        }
        let glob = Glob::new(pattern).map_err(|source| ArchiverError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(FileFilter::Glob(glob.compile_matcher()))
    }

    pub fn matches(&self, file_name: &OsStr) -> bool {
        match self {
            FileFilter::All => true,
            FileFilter::Glob(matcher) => matcher.is_match(file_name),
        }
    }
}

/// A reusable packing configuration.
///
/// POSIX support is queried once when the archiver is built and applies to
/// every entry it writes.
#[derive(Debug, Clone)]
pub struct Archiver {
    filter: FileFilter,
    posix: bool,
}

impl Archiver {
    /// Creates an archiver that packs files whose name matches `glob`.
    pub fn new(glob: &str) -> Result<Self, ArchiverError> {
        Ok(Self {
            filter: FileFilter::new(glob)?,
            posix: fsx::posix_supported(),
        })
    }

    /// Overrides the platform's POSIX capability; without it file modes are left at the container default.
    pub fn posix_attributes(mut self, enabled: bool) -> Self {
        self.posix = enabled;
        self
    }

    /// Packs every matching file and symlink under `source_dir` into a new archive at `dest`.
    ///
    /// The destination is created or truncated. Returns `true` if at least one
    /// entry was written; an archive without entries is still a valid container.
    pub fn archive(&self, source_dir: &Path, dest: &Path) -> Result<bool, ArchiverError> {
        if !source_dir.is_dir() {
            return Err(ArchiverError::Io {
                source: io::Error::new(io::ErrorKind::InvalidInput, "source is not a directory"),
                path: source_dir.to_path_buf(),
            });
        }

        let out = File::create(dest).map_err(ArchiverError::io(dest))?;
        let dest_canonical = fs::canonicalize(dest).map_err(ArchiverError::io(dest))?;
        let mut zip = ZipWriter::new(BufWriter::new(out));
        let mut packed = 0usize;

        for entry in WalkDir::new(source_dir).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() && !file_type.is_symlink() {
                debug!(path = %entry.path().display(), "skipping special file");
                continue;
            }
            if !self.filter.matches(entry.file_name()) {
                continue;
            }
            if file_type.is_file() && is_same_file(entry.path(), &dest_canonical) {
                continue;
            }

            let name = entry_name(source_dir, entry.path())?;
            if file_type.is_symlink() {
                add_symlink(&mut zip, entry.path(), &name)?;
            } else {
                self.add_file(&mut zip, entry.path(), &name)?;
            }
            packed += 1;
        }

        let mut writer = zip.finish()?;
        writer.flush().map_err(ArchiverError::io(dest))?;

        info!(source = %source_dir.display(), archive = %dest.display(), entries = packed, "archive written");
        Ok(packed > 0)
    }

    fn add_file<W: Write + io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        path: &Path,
        name: &str,
    ) -> Result<(), ArchiverError> {
        let metadata = fs::metadata(path).map_err(ArchiverError::io(path))?;
        let times = EntryTimes::from_metadata(&metadata).map_err(ArchiverError::io(path))?;

        let mut options = FileOptions::default()
            .last_modified_time(mtime::to_dos_time(times.modified))
            .large_file(metadata.len() >= ZIP64_THRESHOLD);
        if self.posix {
            let perms = fsx::read_permissions(path).map_err(ArchiverError::io(path))?;
            options = options.unix_permissions(permissions::to_unix_mode(&perms));
        }

        let mut source = File::open(path).map_err(ArchiverError::io(path))?;
        zip.start_file_with_extra_data(name, options)?;
        zip.write_all(&mtime::ntfs_extra_field(&times)).map_err(ArchiverError::io(path))?;
        zip.end_extra_data()?;
        let copied = io::copy(&mut source, zip).map_err(ArchiverError::io(path))?;

        debug!(entry = name, bytes = copied, "packed file");
        Ok(())
    }
}

fn add_symlink<W: Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
) -> Result<(), ArchiverError> {
    let target = fs::read_link(path).map_err(ArchiverError::io(path))?;
    let target_text = target.to_str().ok_or_else(|| ArchiverError::NonUtf8Path(target.clone()))?;

    let mut options = FileOptions::default().unix_permissions(DEFAULT_LINK_PERM);
    if let Ok(metadata) = fs::symlink_metadata(path) {
        if let Ok(modified) = metadata.modified() {
            options = options.last_modified_time(mtime::to_dos_time(mtime::system_time_to_millis(modified)));
        }
    }
    zip.add_symlink(name, target_text, options)?;

    debug!(entry = name, target = target_text, "packed symlink");
    Ok(())
}

/// Packs `source_dir` into `dest`, keeping only files whose name matches `glob`.
///
/// Returns `true` if anything was packed.
pub fn archive_dir(source_dir: &Path, dest: &Path, glob: &str) -> Result<bool, ArchiverError> {
    Archiver::new(glob)?.archive(source_dir, dest)
}

/// Forward-slash path of `path` relative to `root`.
fn entry_name(root: &Path, path: &Path) -> Result<String, ArchiverError> {
    let relative = path.strip_prefix(root).map_err(|_| ArchiverError::StripPrefix {
        prefix: root.to_path_buf(),
        path: path.to_path_buf(),
    })?;
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| ArchiverError::NonUtf8Path(path.to_path_buf()))?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

fn is_same_file(path: &Path, canonical: &Path) -> bool {
    path.file_name() == canonical.file_name()
        && fs::canonicalize(path).map_or(false, |p| p == canonical)
}

/// True for regular, non-hidden files with a well-known archive extension.
pub fn is_archive(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    if name.starts_with('.') || !path.is_file() {
        return false;
    }
    ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
