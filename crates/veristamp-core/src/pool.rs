//! Concurrent stamp interning.
//!
//! The pool maps each distinct [`Stamp`] tuple to one dense [`StampSeq`] and
//! back. Interning is idempotent: racing callers interning the same tuple
//! converge on a single sequence, and a sequence is never reassigned.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

use crate::error::VersionError;
use crate::stamp::{Stamp, StampSeq};

/// Interning pool for stamps.
///
/// Owned by the top-level service and passed by reference into every
/// component that needs tuple lookups; there is no process-global pool.
#[derive(Debug, Default)]
pub struct StampPool {
    sequences: DashMap<Stamp, StampSeq>,
    stamps: DashMap<StampSeq, Stamp>,
    next: AtomicU32,
}

impl StampPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `stamp`, returning its sequence. Same tuple, same sequence,
    /// forever — including under concurrent callers (the entry lock makes
    /// the allocate-and-publish step atomic per tuple).
    pub fn intern(&self, stamp: Stamp) -> StampSeq {
        if let Some(seq) = self.sequences.get(&stamp) {
            return *seq;
        }
        *self.sequences.entry(stamp).or_insert_with(|| {
            let seq = self.next.fetch_add(1, Ordering::Relaxed);
            // Publish the reverse mapping before the sequence escapes, so
            // resolve() is total for every sequence intern() has returned.
            self.stamps.insert(seq, stamp);
            seq
        })
    }

    /// Pure lookup. Fails only for sequences this pool never issued, which
    /// is an upstream programming error.
    pub fn resolve(&self, seq: StampSeq) -> Result<Stamp, VersionError> {
        self.stamps
            .get(&seq)
            .map(|s| *s)
            .ok_or(VersionError::InvisibleStamp { seq })
    }

    pub fn contains(&self, seq: StampSeq) -> bool {
        self.stamps.contains_key(&seq)
    }

    /// Number of distinct stamps interned so far.
    pub fn len(&self) -> usize {
        self.next.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
