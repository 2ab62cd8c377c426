//! Total ordering over visible versions.
//!
//! A chronicle with genuine concurrent edits has no total order. The strict
//! API refuses such input with a typed error instead of inventing a winner;
//! [`ordered_with_tiebreak`] is the explicit opt-in for callers that accept
//! a deterministic linear extension instead, with concurrent pairs broken
//! by module preference then stamp sequence.

use crate::error::VersionError;
use crate::latest::Stamped;
use crate::pool::StampPool;
use crate::relative::{RelativePosition, RelativePositionCalculator};

/// Committed versions visible under the coordinate, oldest first.
///
/// Fails with [`VersionError::AmbiguousOrdering`] as soon as any visible
/// pair is concurrent; a contradiction is an authoring conflict the caller
/// has to see, not something a sort may paper over.
pub fn visible_ordered_versions<V: Stamped + Clone>(
    versions: &[V],
    pool: &StampPool,
    calc: &RelativePositionCalculator<'_>,
) -> Result<Vec<V>, VersionError> {
    let visible = visible_committed(versions, pool, calc)?;
    let n = visible.len();

    // Rank by predecessor count: in a strict total order the number of
    // versions before v is v's position. Verifies every pair on the way.
    let mut ranks: Vec<(usize, usize)> = Vec::with_capacity(n);
    for i in 0..n {
        let mut before = 0usize;
        for j in 0..n {
            if i == j {
                continue;
            }
            let a = visible[j].stamp_seq();
            let b = visible[i].stamp_seq();
            match calc.fast_relative_position(a, b)? {
                RelativePosition::Before => before += 1,
                RelativePosition::After | RelativePosition::Equal => {}
                relation @ (RelativePosition::Contradiction | RelativePosition::Unreachable) => {
                    return Err(VersionError::AmbiguousOrdering { a, b, relation });
                }
            }
        }
        ranks.push((i, before));
    }

    ranks.sort_by_key(|&(i, before)| (before, visible[i].stamp_seq()));
    let order: Vec<usize> = ranks.into_iter().map(|(i, _)| i).collect();
    let mut out = Vec::with_capacity(n);
    for i in order {
        out.push(visible[i].clone());
    }
    Ok(out)
}

/// Committed visible versions in a deterministic total order, oldest first,
/// with concurrent pairs broken by module preference then stamp sequence.
///
/// The result is a linear extension of the partial order: a version strictly
/// before another is always emitted earlier, whatever tie-break keys the
/// concurrent pairs around them carry.
pub fn ordered_with_tiebreak<V: Stamped + Clone>(
    versions: &[V],
    pool: &StampPool,
    calc: &RelativePositionCalculator<'_>,
) -> Result<Vec<V>, VersionError> {
    let visible = visible_committed(versions, pool, calc)?;
    let n = visible.len();
    let coordinate = calc.coordinate();

    // Tie-break key per version: preference index (unranked modules last),
    // then stamp sequence. Preferred modules sort later, like newer edits.
    let mut keys: Vec<(usize, u32)> = Vec::with_capacity(n);
    for v in &visible {
        let stamp = pool.resolve(v.stamp_seq())?;
        let rank = coordinate
            .module_rank(stamp.module)
            .unwrap_or(coordinate.module_priority.len());
        keys.push((rank, v.stamp_seq()));
    }

    // Predecessor counts over the real Before/After edges only. Concurrent
    // and Equal pairs contribute no edge; they are broken among the ready
    // set below. A per-pair comparator mixing real relations with tie-break
    // keys is not transitive and cannot be handed to a sort.
    let mut pending = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            match calc.fast_relative_position(visible[i].stamp_seq(), visible[j].stamp_seq())? {
                RelativePosition::Before => {
                    successors[i].push(j);
                    pending[j] += 1;
                }
                RelativePosition::After => {
                    successors[j].push(i);
                    pending[i] += 1;
                }
                RelativePosition::Equal
                | RelativePosition::Contradiction
                | RelativePosition::Unreachable => {}
            }
        }
    }

    // Kahn's algorithm; among ready versions the largest key goes first, so
    // the most preferred module lands last, like the newest edit.
    let mut ready: Vec<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut out = Vec::with_capacity(n);
    while !ready.is_empty() {
        let mut pick = 0;
        for (slot, &i) in ready.iter().enumerate() {
            if keys[i] > keys[ready[pick]] {
                pick = slot;
            }
        }
        let i = ready.swap_remove(pick);
        out.push(visible[i].clone());
        for &j in &successors[i] {
            pending[j] -= 1;
            if pending[j] == 0 {
                ready.push(j);
            }
        }
    }
    Ok(out)
}

fn visible_committed<V: Stamped + Clone>(
    versions: &[V],
    pool: &StampPool,
    calc: &RelativePositionCalculator<'_>,
) -> Result<Vec<V>, VersionError> {
    let mut out = Vec::new();
    for v in versions {
        let stamp = pool.resolve(v.stamp_seq())?;
        if calc.is_candidate(&stamp, false) {
            out.push(v.clone());
        }
    }
    Ok(out)
}
