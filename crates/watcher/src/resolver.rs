//! Stat and symlink resolution for tracked paths
//!
//! A tracked path is stat'ed without following links. Symlinks are then
//! resolved one level by hand (so relative targets are anchored at the
//! symlink's directory, as orchestrator volume mounts like
//! `tls.crt -> ..data/tls.crt` require), and the resolved target is stat'ed
//! following any further links.

use crate::events::FileMetadata;
use crate::state::PathState;
use fswatcher_core::error::{Error, Result};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::trace;

/// Outcome of looking at a tracked path during one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Observation {
    /// Fresh state for the path
    State(PathState),
    /// The path is a symlink but its target could not be read. The cycle
    /// skips the path without an event or error.
    UnreadableLink,
}

/// Stat a tracked path, resolving it if it is a symlink.
///
/// Not-found conditions on the path or its target are reported as absence.
/// Any other stat failure is returned as an error and the caller keeps the
/// previous state.
pub(crate) async fn observe(path: &Path) -> Result<Observation> {
    let link = match fs::symlink_metadata(path).await {
        Ok(metadata) => FileMetadata::from(&metadata),
        Err(e) if is_not_found(&e) => return Ok(Observation::State(PathState::Absent)),
        Err(e) => return Err(Error::stat(path, e)),
    };

    if !link.is_symlink {
        return Ok(Observation::State(PathState::File(link)));
    }

    // TODO: decide whether a failed readlink should be reported on the error
    // channel like other stat failures instead of being skipped.
    let target_path = match resolve_link(path).await {
        Ok(target_path) => target_path,
        Err(e) => {
            trace!("Skipping {:?}: failed to read symlink: {}", path, e);
            return Ok(Observation::UnreadableLink);
        }
    };

    let target = match fs::metadata(&target_path).await {
        Ok(metadata) => Some(FileMetadata::from(&metadata)),
        Err(e) if is_not_found(&e) => None,
        Err(e) => return Err(Error::target_stat(path, target_path, e)),
    };

    Ok(Observation::State(PathState::Symlink {
        link,
        target_path,
        target,
    }))
}

/// Read a symlink and anchor a relative target at the symlink's directory
pub(crate) async fn resolve_link(path: &Path) -> io::Result<PathBuf> {
    let target = fs::read_link(path).await?;
    Ok(anchor_target(path, target))
}

fn anchor_target(link: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match link.parent() {
        Some(dir) => dir.join(target),
        None => target,
    }
}

/// Whether a stat error means the path (or one of its parents) is not there
fn is_not_found(error: &io::Error) -> bool {
    matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}
