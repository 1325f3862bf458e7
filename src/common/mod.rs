//! Common utilities and types module.
// Entry metadata shared by packing, unpacking and listing.

pub mod mtime;

use serde::{Deserialize, Serialize};

/// Kind of a single entry within the archive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// Metadata for a single entry, as reported by [`crate::extract::list_entries`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Slash-separated path relative to the archived root.
    pub path: String,
    pub kind: EntryKind,
    /// The 9-bit permission mode, if the archive recorded one.
    pub mode: Option<u32>,
    /// Uncompressed payload size; for symlinks the length of the target text.
    pub size: u64,
    /// Last modification, milliseconds since the unix epoch.
    pub modified_millis: Option<i64>,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            EntryKind::File => "file",
            EntryKind::Directory => "dir",
            EntryKind::Symlink => "link",
        };
        f.write_str(tag)
    }
}
