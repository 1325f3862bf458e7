//! # dirsnap Core Library
//!
//! Packs a filtered subset of a directory tree into a single zip archive and
//! unpacks it again, reproducing file contents, POSIX permission bits,
//! symbolic links and modification times.
//!
//! ## Key Modules
//!
//! - [`archive`]: walks a directory and writes matching files and symlinks into a container.
//! - [`extract`]: restores a container onto disk behind a path-traversal guard.
//! - [`permissions`]: converts between permission-bit sets and numeric unix modes.
//! - [`fsx`]: platform capability query and POSIX-specific filesystem helpers.
//!
//! ## Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! let packed = dirsnap::archive_dir(Path::new("target/site"), Path::new("site.zip"), "*.html")?;
//! if packed {
//!     dirsnap::extract_archive(Path::new("site.zip"), Path::new("restored"))?;
//! }
//! # Ok::<(), dirsnap::ArchiverError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod cli_runner;
pub mod common;
pub mod error;
pub mod extract;
pub mod permissions;

// Cross-platform filesystem wrapper
pub mod fsx;

pub use archive::{archive_dir, is_archive, Archiver};
pub use error::ArchiverError;
pub use extract::{extract_archive, list_entries, Extractor};
