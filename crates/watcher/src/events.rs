//! Change event types and file metadata snapshots
//!
//! Events mirror the subset of fsnotify semantics the polling watcher can
//! observe: a path appeared, its content changed, or it went away.

use bitflags::bitflags;
use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

bitflags! {
    /// Set of file operations reported in a single [`Event`]
    ///
    /// Several operations may be reported at once, so prefer [`Op::has`] over
    /// comparing with `==`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Op: u32 {
        /// A new pathname was created
        const CREATE = 1 << 0;
        /// The pathname was written to; more writes may follow
        const WRITE = 1 << 1;
        /// The pathname was removed
        const REMOVE = 1 << 2;
    }
}

impl Op {
    /// Reports whether this set contains any of the given operations
    pub fn has(self, op: Op) -> bool {
        self.intersects(op)
    }

    /// Operation reported when a path becomes visible: `CREATE`, plus `WRITE`
    /// when it already carries data
    pub(crate) fn created(size: u64) -> Self {
        if size > 0 {
            Op::CREATE | Op::WRITE
        } else {
            Op::CREATE
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// A change to one of the tracked paths
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    /// The tracked path exactly as it was passed to the watcher. For symlinks
    /// this is the link name, never the resolved target.
    pub name: PathBuf,
    /// Operations observed during the polling cycle
    pub op: Op,
}

impl Event {
    /// Create a new event
    pub fn new(name: impl Into<PathBuf>, op: Op) -> Self {
        Self {
            name: name.into(),
            op,
        }
    }

    /// Reports whether this event has any of the given operations
    pub fn has(&self, op: Op) -> bool {
        self.op.has(op)
    }

    /// Path the event refers to
    pub fn path(&self) -> &Path {
        &self.name
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.name.display())
    }
}

/// The parts of a stat result the watcher compares between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Last modified time, when the platform reports one
    pub modified: Option<SystemTime>,
    /// Whether this is a symlink (only possible for non-following stats)
    pub is_symlink: bool,
}

impl FileMetadata {
    #[cfg(test)]
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self {
            size,
            modified: Some(modified),
            is_symlink: false,
        }
    }
}

impl From<&Metadata> for FileMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            is_symlink: metadata.file_type().is_symlink(),
        }
    }
}
