//! The parsed file header.

use serde::Serialize;
use std::fmt;

/// Numeric file permission value from a header (e.g. `0o100644`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileMode(u32);

impl FileMode {
    /// Largest value that fits in a 16-bit `st_mode`.
    pub const MAX: u32 = 0o177777;

    pub fn new(bits: u32) -> Option<Self> {
        (bits <= Self::MAX).then_some(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// True if any execute bit is set.
    pub fn is_executable(self) -> bool {
        self.0 & 0o111 != 0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

/// The single semantic classification of a parsed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Modify,
    Create,
    Delete,
    Rename,
    Copy,
    ModeChange,
}

/// Metadata describing the file(s) a patch touches.
///
/// Built incrementally by exactly one header parser and returned complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct File {
    pub old_name: Option<String>,
    pub new_name: Option<String>,

    pub old_mode: Option<FileMode>,
    pub new_mode: Option<FileMode>,

    /// Abbreviated object ids from a git `index` line.
    pub old_oid_prefix: Option<String>,
    pub new_oid_prefix: Option<String>,

    /// Similarity percentage, 0 to 100.
    pub score: Option<u8>,

    pub is_new: bool,
    pub is_delete: bool,
    pub is_rename: bool,
    pub is_copy: bool,
}

impl File {
    /// Classify the change this header describes.
    ///
    /// Creation and deletion take precedence over rename and copy; a header
    /// with differing modes and nothing else is a mode-only change.
    pub fn change_kind(&self) -> ChangeKind {
        if self.is_new {
            ChangeKind::Create
        } else if self.is_delete {
            ChangeKind::Delete
        } else if self.is_rename {
            ChangeKind::Rename
        } else if self.is_copy {
            ChangeKind::Copy
        } else if self.old_mode.is_some()
            && self.new_mode.is_some()
            && self.old_mode != self.new_mode
        {
            ChangeKind::ModeChange
        } else {
            ChangeKind::Modify
        }
    }

    /// The name to report for this file: the new name unless it was deleted.
    pub fn display_name(&self) -> Option<&str> {
        if self.is_delete {
            self.old_name.as_deref()
        } else {
            self.new_name.as_deref().or(self.old_name.as_deref())
        }
    }
}
