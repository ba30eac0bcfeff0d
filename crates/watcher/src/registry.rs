//! Registry of tracked paths
//!
//! The set of paths is fixed at construction. Entries live in an arena in
//! insertion order and are looked up through an index keyed by the path
//! exactly as the caller spelled it.

use crate::state::PathState;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A tracked path and its state from the most recent cycle
#[derive(Debug, Clone)]
pub(crate) struct TrackedEntry {
    path: PathBuf,
    state: PathState,
}

impl TrackedEntry {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: PathState::Absent,
        }
    }

    /// Path as supplied by the caller
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn state(&self) -> &PathState {
        &self.state
    }

    /// Replace the stored state, returning the previous one
    pub(crate) fn replace(&mut self, state: PathState) -> PathState {
        std::mem::replace(&mut self.state, state)
    }
}

/// Fixed set of tracked paths, owned by the poll loop
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: Vec<TrackedEntry>,
    index: HashMap<OsString, usize>,
}

impl Registry {
    /// Build a registry from caller supplied paths. Duplicates collapse into
    /// the first occurrence.
    pub(crate) fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut registry = Self::default();
        for path in paths {
            let path = path.into();
            if registry.index.contains_key(path.as_os_str()) {
                continue;
            }
            registry
                .index
                .insert(path.as_os_str().to_os_string(), registry.entries.len());
            registry.entries.push(TrackedEntry::new(path));
        }
        registry
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a tracked path
    #[cfg(test)]
    pub(crate) fn get(&self, path: &Path) -> Option<&TrackedEntry> {
        self.index
            .get(path.as_os_str())
            .and_then(|&i| self.entries.get(i))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedEntry> {
        self.entries.iter_mut()
    }

    /// Tracked paths in registration order
    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}
