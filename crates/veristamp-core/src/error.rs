//! Engine error taxonomy.

use thiserror::Error;

use crate::relative::RelativePosition;
use crate::stamp::{Nid, StampSeq};

/// Errors surfaced by the resolution engine.
///
/// An empty resolution result is not an error; callers receive
/// [`crate::latest::LatestVersion::Empty`] for that.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VersionError {
    /// A stamp sequence was presented that the pool never issued. Upstream
    /// programming error; fatal, never retried.
    #[error("stamp sequence {seq} was never interned")]
    InvisibleStamp { seq: StampSeq },

    /// No chronicle exists for the component.
    #[error("unknown component nid {nid}")]
    UnknownComponent { nid: Nid },

    /// The coordinate's position path is absent from the path graph.
    #[error("unknown path nid {path}")]
    UnknownPath { path: Nid },

    /// A chronicle already holds a version for this stamp sequence.
    #[error("chronicle already contains a version stamped {seq}")]
    DuplicateStamp { seq: StampSeq },

    /// Commit was requested but no matching in-progress edit exists.
    #[error("no uncommitted version for author {author} on path {path}")]
    NoUncommitted { author: Nid, path: Nid },

    /// A commit-style operation targeted a version that is already committed.
    #[error("version stamped {seq} is not uncommitted")]
    NotUncommitted { seq: StampSeq },

    /// A total order was requested over versions that contain a genuine
    /// concurrency. Surfaced as a typed error so authoring conflicts are
    /// never silently ordered away.
    #[error("no total order: stamps {a} and {b} are {relation:?}")]
    AmbiguousOrdering {
        a: StampSeq,
        b: StampSeq,
        relation: RelativePosition,
    },
}
