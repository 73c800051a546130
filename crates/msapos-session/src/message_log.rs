#![forbid(unsafe_code)]

//! Append-only transcript of request/response events.
//!
//! [`MessageLog`] is a cheap shared handle: clones see the same entries, so a
//! response callback can append while a display layer takes snapshots.
//!
//! # Invariants
//!
//! 1. Entries keep insertion order and are never edited or removed
//!    individually.
//! 2. [`MessageLog::clear`] is the only way to drop entries; it drops all.
//! 3. Every entry is stored with the [`ENTRY_MARKER`] prefix.
//! 4. [`MessageLog::revision`] increases on every append and clear, so a
//!    reader can tell whether its last snapshot is stale.
//!
//! A poisoned lock is recovered rather than propagated: the log only ever
//! holds fully pushed strings, so its contents stay valid after a panic
//! elsewhere.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Prefix added to every appended entry.
pub const ENTRY_MARKER: &str = "==> ";

#[derive(Debug, Default)]
struct Shared {
    entries: RwLock<Vec<String>>,
    revision: AtomicU64,
}

/// Shared, ordered, append-only message log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    shared: Arc<Shared>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` with the [`ENTRY_MARKER`] prefix.
    pub fn append(&self, entry: impl AsRef<str>) {
        let entry = entry.as_ref();
        tracing::trace!(entry, "message log append");
        let mut entries = self.write();
        entries.push(format!("{ENTRY_MARKER}{entry}"));
        self.shared.revision.fetch_add(1, Ordering::Release);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.write();
        tracing::debug!(dropped = entries.len(), "message log cleared");
        entries.clear();
        self.shared.revision.fetch_add(1, Ordering::Release);
    }

    /// Current entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.read().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Change counter, bumped by every append and clear.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::Acquire)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<String>> {
        self.shared
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<String>> {
        self.shared
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn snapshot_is_marked_inputs_in_order(entries in proptest::collection::vec(".{0,24}", 0..32)) {
            let log = MessageLog::new();
            for entry in &entries {
                log.append(entry);
            }
            let expected: Vec<String> = entries.iter().map(|e| format!("{ENTRY_MARKER}{e}")).collect();
            prop_assert_eq!(log.snapshot(), expected);
            prop_assert_eq!(log.revision(), entries.len() as u64);
        }
    }
}
