use std::io;
use std::path::{Path, PathBuf};

/// The primary error type for all operations in the `dirsnap` crate.
#[derive(Debug, thiserror::Error)]
pub enum ArchiverError {
    /// An I/O error occurred, typically while reading or writing a file.
    /// Includes the path where the error happened.
    #[error("I/O error on path '{}': {source}", .path.display())]
    Io { source: io::Error, path: PathBuf },

    /// An error occurred when trying to strip a prefix from a file path.
    #[error("Could not strip prefix '{}' from path '{}'", .prefix.display(), .path.display())]
    StripPrefix { prefix: PathBuf, path: PathBuf },

    /// An archive entry resolves to a location outside of the extraction directory.
    #[error("Bad archive entry '{entry}': resolves outside of '{}'", .dest.display())]
    PathTraversal { entry: String, dest: PathBuf },

    /// The filename filter could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob { pattern: String, source: globset::Error },

    /// A path or symlink target cannot be represented as UTF-8 inside the archive.
    #[error("Path is not valid UTF-8: '{}'", .0.display())]
    NonUtf8Path(PathBuf),

    /// The zip container could not be read or written.
    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl ArchiverError {
    /// Returns a closure that wraps an `io::Error` with the given path, for use with `map_err`.
    pub fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> ArchiverError {
        let path = path.as_ref().to_path_buf();
        move |source| ArchiverError::Io { source, path }
    }

    /// True for errors raised by the path-traversal guard.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, ArchiverError::PathTraversal { .. })
    }
}

// Generic IO error conversion that doesn't require a path
impl From<io::Error> for ArchiverError {
    fn from(err: io::Error) -> Self {
        ArchiverError::Io { source: err, path: PathBuf::new() }
    }
}

impl From<walkdir::Error> for ArchiverError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        ArchiverError::Io { source: err.into(), path }
    }
}
