//! Path-origin DAG queries.
//!
//! Paths are named branches. Each path lists zero or more origins, the
//! `(path, time)` points it branched from; together they form a DAG. The
//! engine only ever asks one question of it: "where did this path come
//! from?" — everything else is derived by the relative-position calculator.

use dashmap::DashMap;

use crate::stamp::Nid;

/// One origin edge of a path: branched from `path` at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOrigin {
    pub path: Nid,
    pub time: i64,
}

impl PathOrigin {
    pub const fn new(path: Nid, time: i64) -> Self {
        Self { path, time }
    }
}

/// Read-only origin queries over the path DAG.
///
/// The production graph lives in an external store; this trait is the narrow
/// seam the calculator consumes.
pub trait PathGraph: Send + Sync {
    /// Origin edges of `path`, empty for a root path.
    fn origins_of(&self, path: Nid) -> Vec<PathOrigin>;

    /// Whether `path` is known to the graph at all. A root path exists with
    /// zero origins; an unknown path does not.
    fn exists(&self, path: Nid) -> bool;
}

/// In-memory [`PathGraph`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct PathMap {
    origins: DashMap<Nid, Vec<PathOrigin>>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` with its origin edges. A root path passes an empty
    /// slice. Re-adding a path replaces its origins.
    pub fn add_path(&self, path: Nid, origins: &[PathOrigin]) {
        self.origins.insert(path, origins.to_vec());
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

impl PathGraph for PathMap {
    fn origins_of(&self, path: Nid) -> Vec<PathOrigin> {
        self.origins.get(&path).map(|o| o.clone()).unwrap_or_default()
    }

    fn exists(&self, path: Nid) -> bool {
        self.origins.contains_key(&path)
    }
}
