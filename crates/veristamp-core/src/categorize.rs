//! Categorization of a whole chronicle under one coordinate.
//!
//! Where latest-version resolution answers "what is current?", this answers
//! "what is everything else?": every version lands in exactly one of five
//! buckets. Computed fresh per query from a snapshot plus the resolved
//! latest; no hidden state.

use crate::error::VersionError;
use crate::latest::{resolve_latest, LatestVersion, Stamped};
use crate::pool::StampPool;
use crate::relative::RelativePositionCalculator;
use crate::stamp::StampSeq;

/// The bucket a version falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCategory {
    /// In-progress edit, regardless of stamp visibility.
    Uncommitted,
    /// The single winner of an uncontradicted resolution.
    UncontradictedLatest,
    /// Winner or contradiction member of a contradicted resolution.
    ContradictedLatest,
    /// Visible under the coordinate but legitimately superseded.
    Prior,
    /// Not visible under this coordinate at all (unrelated path, future
    /// time, filtered status).
    Uncategorized,
}

/// Five-way partition of a chronicle's versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedVersions<V> {
    latest: LatestVersion<V>,
    pub uncommitted: Vec<V>,
    pub uncontradicted_latest: Vec<V>,
    pub contradicted_latest: Vec<V>,
    pub prior: Vec<V>,
    pub uncategorized: Vec<V>,
}

impl<V: Stamped> CategorizedVersions<V> {
    /// The committed-only resolution the partition was derived from.
    pub fn latest(&self) -> &LatestVersion<V> {
        &self.latest
    }

    pub fn category_of(&self, seq: StampSeq) -> Option<VersionCategory> {
        let buckets = [
            (&self.uncommitted, VersionCategory::Uncommitted),
            (
                &self.uncontradicted_latest,
                VersionCategory::UncontradictedLatest,
            ),
            (
                &self.contradicted_latest,
                VersionCategory::ContradictedLatest,
            ),
            (&self.prior, VersionCategory::Prior),
            (&self.uncategorized, VersionCategory::Uncategorized),
        ];
        for (bucket, category) in buckets {
            if bucket.iter().any(|v| v.stamp_seq() == seq) {
                return Some(category);
            }
        }
        None
    }

    pub fn total(&self) -> usize {
        self.uncommitted.len()
            + self.uncontradicted_latest.len()
            + self.contradicted_latest.len()
            + self.prior.len()
            + self.uncategorized.len()
    }
}

/// Partitions `versions` against `calc`'s coordinate.
///
/// The latest set is resolved committed-only first; classification of each
/// version is then a pure function of its stamp and that result.
pub fn categorize<V: Stamped + Clone>(
    versions: &[V],
    pool: &StampPool,
    calc: &RelativePositionCalculator<'_>,
) -> Result<CategorizedVersions<V>, VersionError> {
    let latest = resolve_latest(versions, pool, calc, true)?;
    let contradicted = latest.is_contradicted();

    let mut out = CategorizedVersions {
        latest: latest.clone(),
        uncommitted: Vec::new(),
        uncontradicted_latest: Vec::new(),
        contradicted_latest: Vec::new(),
        prior: Vec::new(),
        uncategorized: Vec::new(),
    };

    for version in versions {
        let stamp = pool.resolve(version.stamp_seq())?;
        if stamp.is_uncommitted() {
            out.uncommitted.push(version.clone());
        } else if latest.contains_stamp(version.stamp_seq()) {
            if contradicted {
                out.contradicted_latest.push(version.clone());
            } else {
                out.uncontradicted_latest.push(version.clone());
            }
        } else if calc.is_candidate(&stamp, false) {
            out.prior.push(version.clone());
        } else {
            out.uncategorized.push(version.clone());
        }
    }

    Ok(out)
}
