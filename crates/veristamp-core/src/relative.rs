//! Coordinate-relative partial order between stamp sequences.
//!
//! The calculator precomputes, for one coordinate, the set of path segments
//! visible from the coordinate's position: a depth-limited walk of the
//! path-origin DAG where each hop caps the time window at the origin time.
//! Every pairwise comparison is then a couple of map lookups.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::coordinate::{Precedence, StampCoordinate};
use crate::error::VersionError;
use crate::path::PathGraph;
use crate::pool::StampPool;
use crate::stamp::{Nid, Stamp, StampSeq};

/// The five-way ordering relation between two stamps, as seen from one
/// coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePosition {
    Before,
    Equal,
    After,
    /// Both stamps are visible but neither path precedes the other: genuine
    /// concurrent edits. An authoring conflict, not a bug.
    Contradiction,
    /// At least one stamp sits on a path the coordinate cannot see at all.
    Unreachable,
}

/// One visible path segment: a path plus the time window the walk reached
/// it through.
#[derive(Debug, Clone)]
struct Segment {
    seq: u32,
    /// Latest time on this path still inside the view. For the position
    /// path this is the coordinate ceiling; for origins it is capped by the
    /// branch time of every hop on the route.
    end_time: i64,
    /// Segment sequences of the paths that branched off this one on the
    /// route back to the position.
    followers: BTreeSet<u32>,
}

impl Segment {
    #[inline]
    fn precedes(&self, other: &Segment) -> bool {
        self.followers.contains(&other.seq)
    }

    #[inline]
    fn within(&self, time: i64) -> bool {
        time <= self.end_time
    }
}

/// Computes [`RelativePosition`] between stamp sequences for one coordinate.
///
/// Construction walks the path DAG once; comparisons afterwards are cheap
/// and read-only, so one calculator can serve a whole batch of resolutions
/// against the same coordinate.
#[derive(Debug)]
pub struct RelativePositionCalculator<'a> {
    pool: &'a StampPool,
    coordinate: &'a StampCoordinate,
    segments: BTreeMap<Nid, Segment>,
}

impl<'a> RelativePositionCalculator<'a> {
    pub fn new(
        pool: &'a StampPool,
        graph: &'a dyn PathGraph,
        coordinate: &'a StampCoordinate,
    ) -> Result<Self, VersionError> {
        let position = coordinate.position;
        if !graph.exists(position.path) {
            return Err(VersionError::UnknownPath {
                path: position.path,
            });
        }

        // Breadth-first from the position path towards origins. First route
        // to a path wins, which keeps diamond-shaped DAGs deterministic.
        let mut segments: BTreeMap<Nid, Segment> = BTreeMap::new();
        let mut queue: VecDeque<(Nid, i64, BTreeSet<u32>)> = VecDeque::new();
        queue.push_back((position.path, position.time, BTreeSet::new()));
        let mut next_seq = 0u32;

        while let Some((path, end_time, followers)) = queue.pop_front() {
            if segments.contains_key(&path) {
                continue;
            }
            let seq = next_seq;
            next_seq += 1;
            let mut child_followers = followers.clone();
            child_followers.insert(seq);
            for origin in graph.origins_of(path) {
                queue.push_back((
                    origin.path,
                    end_time.min(origin.time),
                    child_followers.clone(),
                ));
            }
            segments.insert(
                path,
                Segment {
                    seq,
                    end_time,
                    followers,
                },
            );
        }

        Ok(Self {
            pool,
            coordinate,
            segments,
        })
    }

    pub fn coordinate(&self) -> &StampCoordinate {
        self.coordinate
    }

    /// Ordering relation under the coordinate's own precedence policy.
    pub fn fast_relative_position(
        &self,
        a: StampSeq,
        b: StampSeq,
    ) -> Result<RelativePosition, VersionError> {
        self.relative_position_with(a, b, self.coordinate.precedence)
    }

    /// Ordering relation under an explicit precedence policy.
    pub fn relative_position_with(
        &self,
        a: StampSeq,
        b: StampSeq,
        precedence: Precedence,
    ) -> Result<RelativePosition, VersionError> {
        if a == b {
            return Ok(RelativePosition::Equal);
        }
        let sa = self.pool.resolve(a)?;
        let sb = self.pool.resolve(b)?;
        Ok(match precedence {
            Precedence::Path => self.path_relation(&sa, &sb),
            Precedence::Time => self.time_relation(&sa, &sb),
        })
    }

    /// Whether a committed stamp participates in resolution at all.
    ///
    /// A stamp on an unwalked path is invisible. On the position path the
    /// coordinate ceiling is a hard cutoff (times past it are "the future").
    /// On origin paths a stamp past the branch window stays visible — it is
    /// a concurrent edit and must surface as a contradiction, not vanish.
    pub fn is_visible(&self, stamp: &Stamp) -> bool {
        if stamp.is_uncommitted() {
            return false;
        }
        match self.segments.get(&stamp.path) {
            None => false,
            Some(seg) if seg.seq == 0 => seg.within(stamp.time),
            Some(_) => true,
        }
    }

    /// Full candidate filter for resolution: coordinate status/author/module
    /// filters plus visibility. Uncommitted stamps pass only when the caller
    /// asks for them and their path is on the walk.
    pub fn is_candidate(&self, stamp: &Stamp, include_uncommitted: bool) -> bool {
        if !self.coordinate.allowed.contains(stamp.status)
            || !self.coordinate.permits_module(stamp.module)
            || !self.coordinate.permits_author(stamp.author)
        {
            return false;
        }
        if stamp.is_uncommitted() {
            return include_uncommitted && self.segments.contains_key(&stamp.path);
        }
        self.is_visible(stamp)
    }

    fn path_relation(&self, a: &Stamp, b: &Stamp) -> RelativePosition {
        let (Some(sa), Some(sb)) = (self.segments.get(&a.path), self.segments.get(&b.path))
        else {
            return RelativePosition::Unreachable;
        };
        if sa.seq == sb.seq {
            return time_order(a.time, b.time);
        }
        // Only the ancestor-side window matters: an ancestor edit inside its
        // window happened before the descendant path branched off, so it
        // precedes everything on the descendant path. Past the window it is
        // concurrent with the branch. The descendant's own window is about
        // its relation to the position, not to its ancestors.
        if sa.precedes(sb) {
            if sa.within(a.time) {
                RelativePosition::Before
            } else {
                RelativePosition::Contradiction
            }
        } else if sb.precedes(sa) {
            if sb.within(b.time) {
                RelativePosition::After
            } else {
                RelativePosition::Contradiction
            }
        } else {
            RelativePosition::Contradiction
        }
    }

    fn time_relation(&self, a: &Stamp, b: &Stamp) -> RelativePosition {
        if !self.segments.contains_key(&a.path) || !self.segments.contains_key(&b.path) {
            return RelativePosition::Unreachable;
        }
        match time_order(a.time, b.time) {
            RelativePosition::Equal => {
                match self.path_relation(a, b) {
                    RelativePosition::Before => RelativePosition::Before,
                    RelativePosition::After => RelativePosition::After,
                    RelativePosition::Equal => RelativePosition::Equal,
                    _ => self.module_tiebreak(a, b),
                }
            }
            order => order,
        }
    }

    fn module_tiebreak(&self, a: &Stamp, b: &Stamp) -> RelativePosition {
        match (
            self.coordinate.module_rank(a.module),
            self.coordinate.module_rank(b.module),
        ) {
            (Some(ra), Some(rb)) if ra < rb => RelativePosition::After,
            (Some(ra), Some(rb)) if ra > rb => RelativePosition::Before,
            (Some(_), None) => RelativePosition::After,
            (None, Some(_)) => RelativePosition::Before,
            _ => RelativePosition::Contradiction,
        }
    }
}

#[inline]
fn time_order(a: i64, b: i64) -> RelativePosition {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => RelativePosition::Before,
        std::cmp::Ordering::Equal => RelativePosition::Equal,
        std::cmp::Ordering::Greater => RelativePosition::After,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathMap, PathOrigin};
    use crate::stamp::Status;

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

    fn active(pool: &StampPool, time: i64, author: Nid, module: Nid, path: Nid) -> StampSeq {
        pool.intern(Stamp::new(Status::Active, time, author, module, path))
    }

    #[test]
    fn identical_sequence_is_equal_even_off_route() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let s = active(&pool, 10, 1, 1, ORPHAN);
        assert_eq!(
            calc.fast_relative_position(s, s).unwrap(),
            RelativePosition::Equal
        );
    }

    #[test]
    fn same_path_compares_by_time() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(MASTER);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let a = active(&pool, 10, 1, 1, MASTER);
        let b = active(&pool, 20, 2, 1, MASTER);
        assert_eq!(
            calc.fast_relative_position(a, b).unwrap(),
            RelativePosition::Before
        );
        assert_eq!(
            calc.fast_relative_position(b, a).unwrap(),
            RelativePosition::After
        );
    }

    #[test]
    fn ancestor_edit_before_descendant_edit() {
        // MASTER@50 precedes DEV@200 when DEV branched from MASTER@100.
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let a = active(&pool, 50, 1, 1, MASTER);
        let b = active(&pool, 200, 2, 1, DEV);
        assert_eq!(
            calc.fast_relative_position(a, b).unwrap(),
            RelativePosition::Before
        );
        assert_eq!(
            calc.fast_relative_position(b, a).unwrap(),
            RelativePosition::After
        );
    }

    #[test]
    fn edit_past_branch_point_is_a_contradiction() {
        // MASTER@300 postdates DEV's branch at 100: concurrent with DEV@150.
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let c = active(&pool, 300, 1, 1, MASTER);
        let d = active(&pool, 150, 2, 1, DEV);
        assert_eq!(
            calc.fast_relative_position(c, d).unwrap(),
            RelativePosition::Contradiction
        );
        assert_eq!(
            calc.fast_relative_position(d, c).unwrap(),
            RelativePosition::Contradiction
        );
    }

    #[test]
    fn grandparent_window_caps_through_every_hop() {
        // From FEATURE, MASTER is reachable through DEV: window min(150, 100).
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(FEATURE);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let old_master = active(&pool, 90, 1, 1, MASTER);
        let feature = active(&pool, 500, 2, 1, FEATURE);
        assert_eq!(
            calc.fast_relative_position(old_master, feature).unwrap(),
            RelativePosition::Before
        );
        let late_master = active(&pool, 120, 1, 1, MASTER);
        assert_eq!(
            calc.fast_relative_position(late_master, feature).unwrap(),
            RelativePosition::Contradiction
        );
    }

    #[test]
    fn descendant_past_its_own_window_still_follows_its_ancestors() {
        // DEV@200 postdates FEATURE's branch at 150 (concurrent with
        // FEATURE edits) but still follows MASTER@50, which predates the
        // DEV branch at 100.
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(FEATURE);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let trunk = active(&pool, 50, 1, 1, MASTER);
        let late_dev = active(&pool, 200, 2, 1, DEV);
        let feature = active(&pool, 500, 3, 1, FEATURE);
        assert_eq!(
            calc.fast_relative_position(trunk, late_dev).unwrap(),
            RelativePosition::Before
        );
        assert_eq!(
            calc.fast_relative_position(late_dev, feature).unwrap(),
            RelativePosition::Contradiction
        );
    }

    #[test]
    fn unrelated_path_is_unreachable() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let a = active(&pool, 10, 1, 1, ORPHAN);
        let b = active(&pool, 20, 2, 1, DEV);
        assert_eq!(
            calc.fast_relative_position(a, b).unwrap(),
            RelativePosition::Unreachable
        );
        assert!(!calc.is_visible(&pool.resolve(a).unwrap()));
    }

    #[test]
    fn position_ceiling_hides_the_future() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(MASTER)
            .with_position(crate::coordinate::StampPosition::new(MASTER, 100));
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let past = active(&pool, 80, 1, 1, MASTER);
        let future = active(&pool, 300, 1, 1, MASTER);
        assert!(calc.is_visible(&pool.resolve(past).unwrap()));
        assert!(!calc.is_visible(&pool.resolve(future).unwrap()));
    }

    #[test]
    fn unknown_position_path_is_rejected() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(42);
        let err = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap_err();
        assert_eq!(err, VersionError::UnknownPath { path: 42 });
    }

    #[test]
    fn unknown_sequence_is_an_invisible_stamp_error() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(MASTER);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        let a = active(&pool, 10, 1, 1, MASTER);
        assert_eq!(
            calc.fast_relative_position(a, 77),
            Err(VersionError::InvisibleStamp { seq: 77 })
        );
    }

    #[test]
    fn time_precedence_orders_by_raw_time() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV).with_precedence(Precedence::Time);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();
        // Under PATH precedence this pair is a contradiction; TIME orders it.
        let c = active(&pool, 300, 1, 1, MASTER);
        let d = active(&pool, 150, 2, 1, DEV);
        assert_eq!(
            calc.fast_relative_position(c, d).unwrap(),
            RelativePosition::After
        );
    }

    #[test]
    fn time_precedence_breaks_exact_ties_by_path_then_module() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(DEV)
            .with_precedence(Precedence::Time)
            .with_module_priority(vec![7, 8]);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();

        // Same time, ancestor relationship: path rule decides.
        let a = active(&pool, 90, 1, 7, MASTER);
        let b = active(&pool, 90, 2, 7, DEV);
        assert_eq!(
            calc.fast_relative_position(a, b).unwrap(),
            RelativePosition::Before
        );

        // Same time, concurrent branches: module priority decides.
        let c = active(&pool, 150, 1, 8, MASTER);
        let d = active(&pool, 150, 2, 7, DEV);
        assert_eq!(
            calc.fast_relative_position(c, d).unwrap(),
            RelativePosition::Before
        );
        assert_eq!(
            calc.fast_relative_position(d, c).unwrap(),
            RelativePosition::After
        );

        // Same time, same module, concurrent: still a contradiction.
        let e = active(&pool, 160, 1, 7, MASTER);
        let f = active(&pool, 160, 2, 7, DEV);
        assert_eq!(
            calc.fast_relative_position(e, f).unwrap(),
            RelativePosition::Contradiction
        );
    }

    #[test]
    fn candidate_filter_applies_status_and_filters() {
        let pool = StampPool::new();
        let graph = graph();
        let coord = StampCoordinate::latest_active_on(MASTER).with_author_filter([1]);
        let calc = RelativePositionCalculator::new(&pool, &graph, &coord).unwrap();

        let ok = pool.resolve(active(&pool, 10, 1, 1, MASTER)).unwrap();
        assert!(calc.is_candidate(&ok, false));

        let inactive = Stamp::new(Status::Inactive, 10, 1, 1, MASTER);
        pool.intern(inactive);
        assert!(!calc.is_candidate(&inactive, false));

        let wrong_author = Stamp::new(Status::Active, 10, 2, 1, MASTER);
        pool.intern(wrong_author);
        assert!(!calc.is_candidate(&wrong_author, false));

        let pending = Stamp::uncommitted(Status::Active, 1, 1, MASTER);
        pool.intern(pending);
        assert!(!calc.is_candidate(&pending, false));
        assert!(calc.is_candidate(&pending, true));
    }
}
