//! Property suites over randomized chronicles and coordinates.
//!
//! Two invariants hold for every chronicle/coordinate pair: the resolved
//! latest set is pairwise-concurrent and dominates everything it excluded,
//! and categorization is a partition of the whole version list.

use proptest::prelude::*;

use veristamp::{
    categorize, resolve_latest, Nid, PathMap, PathOrigin, Precedence, RelativePosition,
    RelativePositionCalculator, Stamp, StampCoordinate, StampPool, StampPosition, StampSeq,
    Status, StatusSet, Version, VersionData, LATEST_TIME,
};

const MASTER: Nid = 1;
const DEV: Nid = 2;
const FEATURE: Nid = 3;
const ORPHAN: Nid = 9;

fn graph() -> PathMap {
    let map = PathMap::new();
    map.add_path(MASTER, &[]);
    map.add_path(DEV, &[PathOrigin::new(MASTER, 100)]);
    map.add_path(FEATURE, &[PathOrigin::new(DEV, 150)]);
    map.add_path(ORPHAN, &[]);
    map
}

#[derive(Debug, Clone)]
struct StampSpec {
    status: Status,
    time: i64,
    author: Nid,
    module: Nid,
    path: Nid,
}

fn stamp_spec() -> impl Strategy<Value = StampSpec> {
    (
        any::<bool>(),
        0i64..=25,
        1i32..=3,
        1i32..=3,
        prop_oneof![Just(MASTER), Just(DEV), Just(FEATURE), Just(ORPHAN)],
    )
        .prop_map(|(active, time, author, module, path)| StampSpec {
            status: if active { Status::Active } else { Status::Inactive },
            time,
            author,
            module,
            path,
        })
}

fn coordinate_spec() -> impl Strategy<Value = StampCoordinate> {
    (
        prop_oneof![Just(MASTER), Just(DEV), Just(FEATURE)],
        prop_oneof![Just(LATEST_TIME), (0i64..=400)],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(path, ceiling, time_precedence, both_statuses)| {
            let allowed = if both_statuses {
                StatusSet::active_and_inactive()
            } else {
                StatusSet::active_only()
            };
            let precedence = if time_precedence {
                Precedence::Time
            } else {
                Precedence::Path
            };
            StampCoordinate::new(allowed, StampPosition::new(path, ceiling), precedence)
                .with_module_priority(vec![1, 2])
        })
}

/// Interns the specs with distinct commit times (authors never share a
/// millisecond in practice; exact ties are covered by the dedicated
/// calculator unit tests) and drops duplicate sequences, since a chronicle
/// holds at most one version per stamp sequence.
fn build_versions(pool: &StampPool, specs: &[StampSpec]) -> Vec<Version> {
    let mut seen: Vec<StampSeq> = Vec::new();
    let mut versions = Vec::new();
    for (index, spec) in specs.iter().enumerate() {
        let time = spec.time * 16 + index as i64;
        let seq = pool.intern(Stamp::new(
            spec.status,
            time,
            spec.author,
            spec.module,
            spec.path,
        ));
        if seen.contains(&seq) {
            continue;
        }
        seen.push(seq);
        versions.push(Version::new(seq, VersionData::Concept));
    }
    versions
}

proptest! {
    #[test]
    fn resolution_closure(
        specs in prop::collection::vec(stamp_spec(), 1..12),
        coord in coordinate_spec(),
    ) {
        let pool = StampPool::new();
        let graph = graph();
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let versions = build_versions(&pool, &specs);

        let latest = resolve_latest(&versions, &pool, &calc, true).unwrap();
        let members = latest.members();

        // Every pair inside the result is mutually concurrent.
        for a in &members {
            for b in &members {
                if a.stamp == b.stamp {
                    continue;
                }
                prop_assert_eq!(
                    calc.fast_relative_position(a.stamp, b.stamp).unwrap(),
                    RelativePosition::Contradiction
                );
            }
        }

        // Every excluded candidate is dominated by some member.
        for v in &versions {
            if latest.contains_stamp(v.stamp) {
                continue;
            }
            let stamp = pool.resolve(v.stamp).unwrap();
            if !calc.is_candidate(&stamp, false) {
                continue;
            }
            let dominated = members.iter().any(|m| {
                matches!(
                    calc.fast_relative_position(v.stamp, m.stamp).unwrap(),
                    RelativePosition::Before | RelativePosition::Equal
                )
            });
            prop_assert!(dominated, "candidate {:?} not dominated", stamp);
        }

        // A non-empty candidate set resolves to a non-empty result.
        let any_candidate = versions.iter().any(|v| {
            let stamp = pool.resolve(v.stamp).unwrap();
            calc.is_candidate(&stamp, false)
        });
        prop_assert_eq!(any_candidate, !latest.is_empty());
    }

    #[test]
    fn categorization_is_a_partition(
        specs in prop::collection::vec(stamp_spec(), 1..12),
        coord in coordinate_spec(),
    ) {
        let pool = StampPool::new();
        let graph = graph();
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let versions = build_versions(&pool, &specs);

        let cats = categorize(&versions, &pool, &calc).unwrap();
        prop_assert_eq!(cats.total(), versions.len());

        // Each version lands in exactly one bucket.
        for v in &versions {
            let hits = [
                &cats.uncommitted,
                &cats.uncontradicted_latest,
                &cats.contradicted_latest,
                &cats.prior,
                &cats.uncategorized,
            ]
            .iter()
            .filter(|bucket| bucket.iter().any(|b| b.stamp == v.stamp))
            .count();
            prop_assert_eq!(hits, 1);
        }

        // The latest buckets are exactly the resolved latest set.
        let latest = resolve_latest(&versions, &pool, &calc, true).unwrap();
        let mut from_buckets: Vec<StampSeq> = cats
            .uncontradicted_latest
            .iter()
            .chain(cats.contradicted_latest.iter())
            .map(|v| v.stamp)
            .collect();
        from_buckets.sort_unstable();
        let mut from_latest: Vec<StampSeq> =
            latest.members().iter().map(|v| v.stamp).collect();
        from_latest.sort_unstable();
        prop_assert_eq!(from_buckets, from_latest);
    }

    #[test]
    fn interning_same_tuple_is_stable(specs in prop::collection::vec(stamp_spec(), 1..20)) {
        let pool = StampPool::new();
        for spec in &specs {
            let stamp = Stamp::new(spec.status, spec.time, spec.author, spec.module, spec.path);
            let first = pool.intern(stamp);
            prop_assert_eq!(pool.intern(stamp), first);
            prop_assert_eq!(pool.resolve(first).unwrap(), stamp);
        }
    }
}
