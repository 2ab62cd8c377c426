//! UUID to nid interning.
//!
//! Components arrive with one or more primordial UUIDs; everything inside
//! the engine speaks dense integer nids. The mapping is append-only and
//! idempotent, same contract as stamp interning.

use std::sync::atomic::{AtomicI32, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

use veristamp_core::Nid;

/// First nid handed out. Keeps zero and small values free for tests and
/// well-known fixtures.
const FIRST_NID: i32 = 1;

/// Concurrent UUID↔nid registry.
#[derive(Debug)]
pub struct IdentityService {
    nids: DashMap<Uuid, Nid>,
    uuids: DashMap<Nid, Uuid>,
    next: AtomicI32,
}

impl Default for IdentityService {
    fn default() -> Self {
        Self {
            nids: DashMap::new(),
            uuids: DashMap::new(),
            next: AtomicI32::new(FIRST_NID),
        }
    }
}

impl IdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nid for `uuid`, allocating one on first sight. Racing callers for
    /// the same UUID converge on one nid.
    pub fn nid_for_uuid(&self, uuid: Uuid) -> Nid {
        if let Some(nid) = self.nids.get(&uuid) {
            return *nid;
        }
        *self.nids.entry(uuid).or_insert_with(|| {
            let nid = self.next.fetch_add(1, Ordering::Relaxed);
            self.uuids.insert(nid, uuid);
            nid
        })
    }

    pub fn uuid_for_nid(&self, nid: Nid) -> Option<Uuid> {
        self.uuids.get(&nid).map(|u| *u)
    }

    pub fn len(&self) -> usize {
        self.nids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nids.is_empty()
    }
}
