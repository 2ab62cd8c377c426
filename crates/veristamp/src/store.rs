//! The version store: one object owning the pool, the path graph, the
//! identity registry and every chronicle.
//!
//! This is the surface the GUI, workflow and serialization layers talk to.
//! All resolution is read-only over snapshots; interning and appending are
//! the only mutating operations and both are safe under concurrency.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};
use uuid::Uuid;

use veristamp_core::{
    categorize, ordered_with_tiebreak, visible_ordered_versions, CategorizedVersions, Chronicle,
    LatestVersion, Nid, PathMap, PathOrigin, RelativePositionCalculator, Stamp, StampCoordinate,
    StampPool, StampSeq, Status, Version, VersionData, VersionError,
};

use crate::identity::IdentityService;

/// In-memory terminology version store.
#[derive(Debug, Default)]
pub struct VersionStore {
    pool: StampPool,
    paths: PathMap,
    identity: IdentityService,
    chronicles: DashMap<Nid, Arc<Chronicle>>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self) -> &StampPool {
        &self.pool
    }

    pub fn paths(&self) -> &PathMap {
        &self.paths
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }

    // ── Paths ──────────────────────────────────────────────────────────────

    /// Registers a path identified by `uuid`, branching from `origins`.
    pub fn create_path(&self, uuid: Uuid, origins: &[PathOrigin]) -> Nid {
        let nid = self.identity.nid_for_uuid(uuid);
        self.paths.add_path(nid, origins);
        debug!(path = nid, origins = origins.len(), "path registered");
        nid
    }

    /// Registers a path already known by nid.
    pub fn add_path(&self, path: Nid, origins: &[PathOrigin]) {
        self.paths.add_path(path, origins);
    }

    // ── Components ─────────────────────────────────────────────────────────

    /// Chronicle for the component with the given primordial UUID, created
    /// on first sight.
    pub fn create_component(&self, primordial: Uuid) -> Arc<Chronicle> {
        let nid = self.identity.nid_for_uuid(primordial);
        self.chronicles
            .entry(nid)
            .or_insert_with(|| {
                debug!(component = nid, "chronicle created");
                Arc::new(Chronicle::new(nid, primordial))
            })
            .clone()
    }

    pub fn chronicle(&self, nid: Nid) -> Result<Arc<Chronicle>, VersionError> {
        self.chronicles
            .get(&nid)
            .map(|c| c.clone())
            .ok_or(VersionError::UnknownComponent { nid })
    }

    // ── Stamps and versions ────────────────────────────────────────────────

    pub fn stamp(&self, status: Status, time: i64, author: Nid, module: Nid, path: Nid) -> StampSeq {
        let seq = self.pool.intern(Stamp::new(status, time, author, module, path));
        trace!(seq, "stamp interned");
        seq
    }

    /// Starts a new in-progress edit on a component.
    pub fn create_version(
        &self,
        nid: Nid,
        status: Status,
        author: Nid,
        module: Nid,
        path: Nid,
        data: VersionData,
    ) -> Result<Version, VersionError> {
        let chronicle = self.chronicle(nid)?;
        chronicle.create_version(status, author, module, path, data, &self.pool)
    }

    /// Copy-on-edit from an existing version of the component.
    pub fn make_analog(
        &self,
        nid: Nid,
        source: &Version,
        author: Nid,
        module: Nid,
        path: Nid,
    ) -> Result<Version, VersionError> {
        let chronicle = self.chronicle(nid)?;
        chronicle.make_analog(source, author, module, path, &self.pool)
    }

    /// Commits the in-progress edit by `author` on `path`, assigning `time`.
    ///
    /// The external commit manager guarantees at most one uncommitted
    /// version per (component, author, path); this finds it or fails with
    /// [`VersionError::NoUncommitted`].
    pub fn commit(
        &self,
        nid: Nid,
        author: Nid,
        path: Nid,
        time: i64,
    ) -> Result<StampSeq, VersionError> {
        let chronicle = self.chronicle(nid)?;
        for version in chronicle.snapshot() {
            let stamp = self.pool.resolve(version.stamp)?;
            if stamp.is_uncommitted() && stamp.author == author && stamp.path == path {
                let committed = chronicle.commit_version(version.stamp, time, &self.pool)?;
                debug!(component = nid, author, path, seq = committed, "version committed");
                return Ok(committed);
            }
        }
        Err(VersionError::NoUncommitted { author, path })
    }

    // ── Resolution ─────────────────────────────────────────────────────────

    /// Winning version(s) of a component under `coordinate`, pending edits
    /// included.
    pub fn resolve_latest(
        &self,
        nid: Nid,
        coordinate: &StampCoordinate,
    ) -> Result<LatestVersion<Version>, VersionError> {
        let chronicle = self.chronicle(nid)?;
        let calc = RelativePositionCalculator::new(&self.pool, &self.paths, coordinate)?;
        let latest = chronicle.resolve_latest(&calc, &self.pool)?;
        debug!(
            component = nid,
            contradicted = latest.is_contradicted(),
            "resolved latest"
        );
        Ok(latest)
    }

    /// Winning version(s) among committed versions only.
    pub fn resolve_latest_committed(
        &self,
        nid: Nid,
        coordinate: &StampCoordinate,
    ) -> Result<LatestVersion<Version>, VersionError> {
        let chronicle = self.chronicle(nid)?;
        let calc = RelativePositionCalculator::new(&self.pool, &self.paths, coordinate)?;
        chronicle.resolve_latest_committed(&calc, &self.pool)
    }

    /// Five-bucket partition of every version of a component.
    pub fn categorize(
        &self,
        nid: Nid,
        coordinate: &StampCoordinate,
    ) -> Result<CategorizedVersions<Version>, VersionError> {
        let chronicle = self.chronicle(nid)?;
        let calc = RelativePositionCalculator::new(&self.pool, &self.paths, coordinate)?;
        categorize(&chronicle.snapshot(), &self.pool, &calc)
    }

    /// Committed visible versions in total order; typed error if the
    /// history contains genuine concurrency.
    pub fn ordered_versions(
        &self,
        nid: Nid,
        coordinate: &StampCoordinate,
    ) -> Result<Vec<Version>, VersionError> {
        let chronicle = self.chronicle(nid)?;
        let calc = RelativePositionCalculator::new(&self.pool, &self.paths, coordinate)?;
        visible_ordered_versions(&chronicle.snapshot(), &self.pool, &calc)
    }

    /// Like [`Self::ordered_versions`] but breaks concurrent pairs by
    /// module preference then stamp sequence instead of failing.
    pub fn ordered_versions_with_tiebreak(
        &self,
        nid: Nid,
        coordinate: &StampCoordinate,
    ) -> Result<Vec<Version>, VersionError> {
        let chronicle = self.chronicle(nid)?;
        let calc = RelativePositionCalculator::new(&self.pool, &self.paths, coordinate)?;
        ordered_with_tiebreak(&chronicle.snapshot(), &self.pool, &calc)
    }
}
