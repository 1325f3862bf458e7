//! Keeps every extracted entry inside the destination directory.

use crate::error::ArchiverError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalized destination root, plus its canonical form once it exists on disk.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    canonical: PathBuf,
}

impl PathGuard {
    /// `dest` must already exist.
    pub fn new(dest: &Path) -> Result<Self, ArchiverError> {
        let absolute = if dest.is_absolute() {
            dest.to_path_buf()
        } else {
            std::env::current_dir().map_err(ArchiverError::io(dest))?.join(dest)
        };
        let canonical = fs::canonicalize(dest).map_err(ArchiverError::io(dest))?;
        Ok(Self { root: normalize(&absolute), canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `entry_name` onto the root and rejects results that leave it.
    pub fn resolve(&self, entry_name: &str) -> Result<PathBuf, ArchiverError> {
        let candidate = normalize(&self.root.join(entry_name));
        if !candidate.starts_with(&self.root) {
            return Err(self.violation(entry_name));
        }
        Ok(candidate)
    }

    /// Checks that an existing directory really lies under the destination once symlinks are resolved.
    pub fn ensure_contained(&self, dir: &Path, entry_name: &str) -> Result<(), ArchiverError> {
        let real = fs::canonicalize(dir).map_err(ArchiverError::io(dir))?;
        if !real.starts_with(&self.canonical) {
            return Err(self.violation(entry_name));
        }
        Ok(())
    }

    /// Creates `dir` one component at a time below the root.
    ///
    /// Symlinks met on the way are resolved and must stay inside the
    /// destination before anything is created through them.
    pub fn create_dir_all(&self, dir: &Path, entry_name: &str) -> Result<(), ArchiverError> {
        let relative = dir.strip_prefix(&self.root).map_err(|_| self.violation(entry_name))?;
        let mut current = self.root.clone();
        for component in relative.components() {
            current.push(component);
            match fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => self.ensure_contained(&current, entry_name)?,
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    fs::create_dir(&current).map_err(ArchiverError::io(&current))?;
                }
                Err(err) => return Err(ArchiverError::io(&current)(err)),
            }
        }
        self.ensure_contained(dir, entry_name)
    }

    fn violation(&self, entry_name: &str) -> ArchiverError {
        ArchiverError::PathTraversal { entry: entry_name.to_string(), dest: self.root.clone() }
    }
}

/// Resolves `.` and `..` without touching the filesystem. `..` never climbs above a root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
