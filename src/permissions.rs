//! Conversion between POSIX permission-bit sets and the numeric unix mode.
//!
//! Both directions are pure. Only the low nine bits of a mode carry meaning
//! here; file-type bits (such as [`LINK_FLAG`]) are handled by the callers.

use std::collections::HashSet;

/// File-type mask of a unix mode.
pub const FILE_TYPE_MASK: u32 = 0o170000;
/// File-type bits marking a symbolic link.
pub const LINK_FLAG: u32 = 0o120000;
/// Permission bits recorded for every symbolic link.
pub const DEFAULT_LINK_PERM: u32 = 0o777;
/// The nine rwx bits.
pub const PERMISSION_MASK: u32 = 0o777;

/// One of the nine owner/group/others read/write/execute permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PosixPermission {
    OwnerRead,
    OwnerWrite,
    OwnerExecute,
    GroupRead,
    GroupWrite,
    GroupExecute,
    OthersRead,
    OthersWrite,
    OthersExecute,
}

/// Unordered set of permissions, the abstract counterpart of a numeric mode.
pub type PermissionSet = HashSet<PosixPermission>;

impl PosixPermission {
    pub const ALL: [PosixPermission; 9] = [
        PosixPermission::OwnerRead,
        PosixPermission::OwnerWrite,
        PosixPermission::OwnerExecute,
        PosixPermission::GroupRead,
        PosixPermission::GroupWrite,
        PosixPermission::GroupExecute,
        PosixPermission::OthersRead,
        PosixPermission::OthersWrite,
        PosixPermission::OthersExecute,
    ];

    /// The bit this permission occupies in a unix mode.
    pub const fn mask(self) -> u32 {
        match self {
            PosixPermission::OwnerRead => 0o400,
            PosixPermission::OwnerWrite => 0o200,
            PosixPermission::OwnerExecute => 0o100,
            PosixPermission::GroupRead => 0o040,
            PosixPermission::GroupWrite => 0o020,
            PosixPermission::GroupExecute => 0o010,
            PosixPermission::OthersRead => 0o004,
            PosixPermission::OthersWrite => 0o002,
            PosixPermission::OthersExecute => 0o001,
        }
    }
}

/// Encodes a permission set as a 9-bit unix mode.
pub fn to_unix_mode(permissions: &PermissionSet) -> u32 {
    permissions.iter().fold(0, |mode, perm| mode | perm.mask())
}

/// Decodes the low nine bits of `mode` into a permission set.
pub fn from_unix_mode(mode: u32) -> PermissionSet {
    PosixPermission::ALL
        .iter()
        .copied()
        .filter(|perm| mode & perm.mask() != 0)
        .collect()
}

/// True when the file-type bits of `mode` describe a symbolic link.
pub fn is_symlink_mode(mode: u32) -> bool {
    mode & FILE_TYPE_MASK == LINK_FLAG
}
