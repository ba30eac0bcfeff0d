//! Per-path state remembered between polling cycles

use crate::events::FileMetadata;
use std::path::{Path, PathBuf};

/// Last observed state of a tracked path
///
/// A path that does not exist has no target, and only symlinks carry target
/// information; both follow from the shape of the enum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum PathState {
    /// Not seen yet, or not present during the last cycle
    #[default]
    Absent,
    /// A path that is not a symlink
    File(FileMetadata),
    /// A symlink, its resolved target path and the target's metadata when the
    /// target exists
    Symlink {
        link: FileMetadata,
        target_path: PathBuf,
        target: Option<FileMetadata>,
    },
}

impl PathState {
    /// Whether the consumer was last told this path exists: a regular file,
    /// or a symlink whose target exists. A dangling symlink has nothing to
    /// read and counts as gone.
    pub(crate) fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::File(_) => true,
            Self::Symlink { target, .. } => target.is_some(),
        }
    }

    /// Following stat of the resolved target; only live symlinks have one
    pub(crate) fn target(&self) -> Option<&FileMetadata> {
        match self {
            Self::Symlink { target, .. } => target.as_ref(),
            _ => None,
        }
    }

    /// Non-following stat of the path itself
    pub(crate) fn self_info(&self) -> Option<&FileMetadata> {
        match self {
            Self::Absent => None,
            Self::File(metadata) => Some(metadata),
            Self::Symlink { link, .. } => Some(link),
        }
    }

    /// Whether the path itself existed, dangling symlinks included
    pub(crate) fn exists(&self) -> bool {
        self.self_info().is_some()
    }

    /// Resolved symlink target, if the path is a symlink
    pub(crate) fn target_path(&self) -> Option<&Path> {
        match self {
            Self::Symlink { target_path, .. } => Some(target_path),
            _ => None,
        }
    }
}
