//! Stamp value types for the version resolution engine.
//!
//! A stamp is the immutable (status, time, author, module, path) tuple that
//! characterizes exactly one version of a component. Stamps are interned by
//! [`crate::pool::StampPool`] and passed around as small [`StampSeq`] handles.

use std::fmt;

/// Opaque integer identifier assigned by the external identity service.
///
/// Authors, modules, paths and components all carry nids.
pub type Nid = i32;

/// Interned handle for a [`Stamp`]. Dense, starts at zero, never reused for
/// a different tuple.
pub type StampSeq = u32;

/// Reserved time meaning "pending commit, no real timestamp yet".
pub const UNCOMMITTED_TIME: i64 = i64::MAX;

/// Highest admissible position ceiling. Strictly below the uncommitted
/// sentinel so no position can make an uncommitted stamp look committed.
pub const LATEST_TIME: i64 = i64::MAX - 1;

// ── Status ─────────────────────────────────────────────────────────────────

/// Lifecycle state carried by a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Active,
    Inactive,
    /// Bootstrap marker used by primordial stamps created before any author
    /// has committed content.
    Primordial,
}

impl Status {
    pub(crate) const fn bit(self) -> u8 {
        match self {
            Status::Active => 0b001,
            Status::Inactive => 0b010,
            Status::Primordial => 0b100,
        }
    }
}

/// A small fixed-capacity set of [`Status`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusSet {
    bits: u8,
}

impl StatusSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub const fn active_only() -> Self {
        Self {
            bits: Status::Active.bit(),
        }
    }

    pub const fn active_and_inactive() -> Self {
        Self {
            bits: Status::Active.bit() | Status::Inactive.bit(),
        }
    }

    pub const fn with(self, status: Status) -> Self {
        Self {
            bits: self.bits | status.bit(),
        }
    }

    pub const fn contains(self, status: Status) -> bool {
        self.bits & status.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

// ── Stamp ──────────────────────────────────────────────────────────────────

/// An immutable version stamp: `(status, time, author, module, path)`.
///
/// Two stamps with identical fields are the same stamp and intern to the
/// same sequence. Time is signed epoch millis; [`UNCOMMITTED_TIME`] marks an
/// in-progress edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stamp {
    pub status: Status,
    pub time: i64,
    pub author: Nid,
    pub module: Nid,
    pub path: Nid,
}

impl Stamp {
    pub const fn new(status: Status, time: i64, author: Nid, module: Nid, path: Nid) -> Self {
        Self {
            status,
            time,
            author,
            module,
            path,
        }
    }

    /// An uncommitted stamp for an in-progress edit by `author` on `path`.
    pub const fn uncommitted(status: Status, author: Nid, module: Nid, path: Nid) -> Self {
        Self::new(status, UNCOMMITTED_TIME, author, module, path)
    }

    #[inline]
    pub const fn is_uncommitted(&self) -> bool {
        self.time == UNCOMMITTED_TIME
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uncommitted() {
            write!(
                f,
                "{:?}@uncommitted a{} m{} p{}",
                self.status, self.author, self.module, self.path
            )
        } else {
            write!(
                f,
                "{:?}@{} a{} m{} p{}",
                self.status, self.time, self.author, self.module, self.path
            )
        }
    }
}
