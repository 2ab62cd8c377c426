//! Chronicles: append-only version histories of one component.
//!
//! A chronicle owns every version ever authored for a component, committed
//! or pending. Versions are appended, never mutated or removed; readers
//! take a snapshot of the list and resolve against it without holding any
//! lock.

use std::sync::RwLock;

use uuid::Uuid;

use crate::error::VersionError;
use crate::latest::{resolve_latest, LatestVersion, Stamped};
use crate::pool::StampPool;
use crate::relative::RelativePositionCalculator;
use crate::stamp::{Nid, Stamp, StampSeq, Status};

// ── Payloads ───────────────────────────────────────────────────────────────

/// One scalar field of a dynamic-schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicField {
    Nid(Nid),
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Type-specific payload of a version.
///
/// A closed set keyed by component kind. Resolution never inspects these;
/// only the stamp matters for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionData {
    /// A bare concept; identity is the payload.
    Concept,
    /// A reference to another component.
    ComponentRef { referenced: Nid },
    StringValue(String),
    LongValue(i64),
    Description {
        text: String,
        language: Nid,
        case_significance: Nid,
    },
    /// Serialized logic-graph axiom data, opaque to this engine.
    LogicGraph(Vec<u8>),
    Dynamic(Vec<DynamicField>),
    /// Plain set membership.
    Member,
}

// ── Version ────────────────────────────────────────────────────────────────

/// One snapshot of a component's attributes at a stamp.
///
/// Immutable once committed; "editing" means appending an analog with a
/// fresh stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub stamp: StampSeq,
    pub data: VersionData,
}

impl Version {
    pub const fn new(stamp: StampSeq, data: VersionData) -> Self {
        Self { stamp, data }
    }

    pub fn is_uncommitted(&self, pool: &StampPool) -> Result<bool, VersionError> {
        Ok(pool.resolve(self.stamp)?.is_uncommitted())
    }
}

impl Stamped for Version {
    fn stamp_seq(&self) -> StampSeq {
        self.stamp
    }
}

// ── Chronicle ──────────────────────────────────────────────────────────────

/// Append-only version history for one component.
///
/// Appends take the write lock for one push; everything else reads a
/// snapshot. Concurrent appends from different authors are safe; the
/// at-most-one-version-per-stamp invariant is enforced here, at creation.
#[derive(Debug)]
pub struct Chronicle {
    nid: Nid,
    primordial: Uuid,
    versions: RwLock<Vec<Version>>,
}

impl Chronicle {
    pub fn new(nid: Nid, primordial: Uuid) -> Self {
        Self {
            nid,
            primordial,
            versions: RwLock::new(Vec::new()),
        }
    }

    pub fn nid(&self) -> Nid {
        self.nid
    }

    pub fn primordial(&self) -> Uuid {
        self.primordial
    }

    /// A consistent copy of the version list. Lock held only for the clone.
    pub fn snapshot(&self) -> Vec<Version> {
        self.versions.read().expect("chronicle lock poisoned").clone()
    }

    pub fn stamp_sequences(&self) -> Vec<StampSeq> {
        self.versions
            .read()
            .expect("chronicle lock poisoned")
            .iter()
            .map(|v| v.stamp)
            .collect()
    }

    pub fn version_count(&self) -> usize {
        self.versions.read().expect("chronicle lock poisoned").len()
    }

    /// Appends a version, rejecting a stamp sequence already present.
    pub fn append(&self, version: Version) -> Result<(), VersionError> {
        let mut versions = self.versions.write().expect("chronicle lock poisoned");
        if versions.iter().any(|v| v.stamp == version.stamp) {
            return Err(VersionError::DuplicateStamp {
                seq: version.stamp,
            });
        }
        versions.push(version);
        Ok(())
    }

    /// Creates a new mutable (uncommitted) version with the given payload
    /// and appends it.
    pub fn create_version(
        &self,
        status: Status,
        author: Nid,
        module: Nid,
        path: Nid,
        data: VersionData,
        pool: &StampPool,
    ) -> Result<Version, VersionError> {
        let seq = pool.intern(Stamp::uncommitted(status, author, module, path));
        let version = Version::new(seq, data);
        self.append(version.clone())?;
        Ok(version)
    }

    /// Copy-on-edit: a brand-new uncommitted version carrying `source`'s
    /// payload under a fresh stamp. `source` is untouched.
    pub fn make_analog(
        &self,
        source: &Version,
        author: Nid,
        module: Nid,
        path: Nid,
        pool: &StampPool,
    ) -> Result<Version, VersionError> {
        let status = pool.resolve(source.stamp)?.status;
        self.create_version(status, author, module, path, source.data.clone(), pool)
    }

    /// Commit transition: the uncommitted version stamped `seq` is replaced
    /// by a committed version with the same payload and a fresh stamp whose
    /// time is `time`. Returns the new stamp sequence.
    pub fn commit_version(
        &self,
        seq: StampSeq,
        time: i64,
        pool: &StampPool,
    ) -> Result<StampSeq, VersionError> {
        let old = pool.resolve(seq)?;
        if !old.is_uncommitted() {
            return Err(VersionError::NotUncommitted { seq });
        }
        let committed = pool.intern(Stamp::new(
            old.status, time, old.author, old.module, old.path,
        ));

        let mut versions = self.versions.write().expect("chronicle lock poisoned");
        if versions.iter().any(|v| v.stamp == committed) {
            return Err(VersionError::DuplicateStamp { seq: committed });
        }
        let index = versions
            .iter()
            .position(|v| v.stamp == seq)
            .ok_or(VersionError::InvisibleStamp { seq })?;
        // Discard the pending version, insert the committed one with the
        // same payload.
        let pending = versions.remove(index);
        versions.push(Version::new(committed, pending.data));
        Ok(committed)
    }

    /// Resolves the winning version(s) under `calc`'s coordinate, pending
    /// edits included.
    pub fn resolve_latest(
        &self,
        calc: &RelativePositionCalculator<'_>,
        pool: &StampPool,
    ) -> Result<LatestVersion<Version>, VersionError> {
        resolve_latest(&self.snapshot(), pool, calc, false)
    }

    /// Resolves the winning version(s) among committed versions only.
    pub fn resolve_latest_committed(
        &self,
        calc: &RelativePositionCalculator<'_>,
        pool: &StampPool,
    ) -> Result<LatestVersion<Version>, VersionError> {
        resolve_latest(&self.snapshot(), pool, calc, true)
    }
}
