//! Event synthesis from consecutive observations of one path
//!
//! A regular file is compared with what the path itself was last cycle. A
//! symlink is compared with what its target was last cycle, so anything that
//! was not a live symlink before (a regular file included) counts as having
//! no target:
//!
//! | now                 | before                        | op                                  |
//! |---------------------|-------------------------------|-------------------------------------|
//! | absent              | file or live symlink          | `REMOVE`                            |
//! | file                | absent or dangling symlink    | `CREATE`, plus `WRITE` if non-empty |
//! | file                | file or live symlink          | `WRITE` if size or mtime changed    |
//! | live symlink        | anything but a live symlink   | `CREATE`, plus `WRITE` if non-empty |
//! | live symlink        | live symlink                  | `WRITE` if target, size or mtime changed |
//! | dangling symlink    | live symlink                  | `REMOVE`                            |
//!
//! Every other pair is silent. A path that was absent or dangling has already
//! been reported gone, so neither of them produces a `REMOVE` again.

use crate::events::{FileMetadata, Op};
use crate::state::PathState;

/// Compute the operations to report for a path given its previous and current
/// state, or `None` if nothing observable changed.
pub(crate) fn diff(previous: &PathState, current: &PathState) -> Option<Op> {
    match current {
        PathState::Absent => previous.is_present().then_some(Op::REMOVE),
        PathState::File(now) => match previous {
            PathState::File(before)
            | PathState::Symlink {
                link: before,
                target: Some(_),
                ..
            } => modified(before, now).then_some(Op::WRITE),
            _ => Some(Op::created(now.size)),
        },
        PathState::Symlink {
            target_path,
            target: Some(now),
            ..
        } => match previous {
            PathState::Symlink {
                target_path: before_path,
                target: Some(before),
                ..
            } => (before_path != target_path || modified(before, now)).then_some(Op::WRITE),
            _ => Some(Op::created(now.size)),
        },
        PathState::Symlink { target: None, .. } => {
            previous.target().is_some().then_some(Op::REMOVE)
        }
    }
}

fn modified(before: &FileMetadata, now: &FileMetadata) -> bool {
    before.size != now.size || before.modified != now.modified
}
