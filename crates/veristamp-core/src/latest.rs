//! Latest-version reduction.
//!
//! Resolving a chronicle against a coordinate folds its candidate versions
//! down to one winner plus the set of versions genuinely concurrent with
//! it. The three outcomes are distinct variants so "nothing visible",
//! "exactly one" and "many co-equal" are all checked at the call site.

use crate::error::VersionError;
use crate::pool::StampPool;
use crate::relative::{RelativePosition, RelativePositionCalculator};
use crate::stamp::StampSeq;

/// Anything that carries a stamp sequence. The reduction is payload-agnostic
/// and only ever reads this.
pub trait Stamped {
    fn stamp_seq(&self) -> StampSeq;
}

/// Result of resolving a chronicle against a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestVersion<V> {
    /// No version is visible under the coordinate. A normal outcome.
    Empty,
    /// One version strictly dominates every other visible version.
    Single(V),
    /// Concurrent edits: a nominal winner plus the versions that are
    /// pairwise incomparable with it. Requires human resolution.
    Contradicted(V, Vec<V>),
}

impl<V> LatestVersion<V> {
    pub fn is_empty(&self) -> bool {
        matches!(self, LatestVersion::Empty)
    }

    pub fn is_contradicted(&self) -> bool {
        matches!(self, LatestVersion::Contradicted(..))
    }

    /// The nominal winner, if any version is visible.
    pub fn value(&self) -> Option<&V> {
        match self {
            LatestVersion::Empty => None,
            LatestVersion::Single(v) => Some(v),
            LatestVersion::Contradicted(v, _) => Some(v),
        }
    }

    pub fn contradictions(&self) -> &[V] {
        match self {
            LatestVersion::Contradicted(_, rest) => rest,
            _ => &[],
        }
    }

    /// Winner plus contradictions, in reduction order.
    pub fn members(&self) -> Vec<&V> {
        match self {
            LatestVersion::Empty => Vec::new(),
            LatestVersion::Single(v) => vec![v],
            LatestVersion::Contradicted(v, rest) => {
                let mut out = vec![v];
                out.extend(rest.iter());
                out
            }
        }
    }
}

impl<V: Stamped> LatestVersion<V> {
    /// Whether the resolved set contains the given stamp sequence.
    pub fn contains_stamp(&self, seq: StampSeq) -> bool {
        self.members().iter().any(|v| v.stamp_seq() == seq)
    }
}

/// Folds `versions` down to the latest set under `calc`'s coordinate.
///
/// Candidates are the versions passing the coordinate's status, author and
/// module filters whose stamps are visible (uncommitted ones only when
/// `committed_only` is false). Each candidate is compared against every
/// running member: it is discarded when any member supersedes it, evicts
/// every member it supersedes, and otherwise joins the set as a
/// contradiction. The result set is therefore pairwise-concurrent. It is
/// also independent of fold order except for Equal twins: two distinct
/// sequences can compare Equal (same path and time, different author or
/// module — typically two pending edits at the sentinel time), and among
/// those the first-appended version is kept.
pub fn resolve_latest<V: Stamped + Clone>(
    versions: &[V],
    pool: &StampPool,
    calc: &RelativePositionCalculator<'_>,
    committed_only: bool,
) -> Result<LatestVersion<V>, VersionError> {
    let mut members: Vec<V> = Vec::new();

    'candidates: for version in versions {
        let stamp = pool.resolve(version.stamp_seq())?;
        if !calc.is_candidate(&stamp, !committed_only) {
            continue;
        }
        let mut evicted = vec![false; members.len()];
        for (i, member) in members.iter().enumerate() {
            match calc.fast_relative_position(version.stamp_seq(), member.stamp_seq())? {
                RelativePosition::Before | RelativePosition::Equal => continue 'candidates,
                RelativePosition::After => evicted[i] = true,
                RelativePosition::Contradiction => {}
                // Candidates were visibility-filtered above; an unreachable
                // pair here can only involve a stamp the filter excluded.
                RelativePosition::Unreachable => continue 'candidates,
            }
        }
        let mut kept = Vec::with_capacity(members.len() + 1);
        for (member, gone) in members.into_iter().zip(evicted) {
            if !gone {
                kept.push(member);
            }
        }
        kept.push(version.clone());
        members = kept;
    }

    let mut members = members.into_iter();
    Ok(match members.next() {
        None => LatestVersion::Empty,
        Some(winner) => {
            let contradictions: Vec<V> = members.collect();
            if contradictions.is_empty() {
                LatestVersion::Single(winner)
            } else {
                LatestVersion::Contradicted(winner, contradictions)
            }
        }
    })
}
