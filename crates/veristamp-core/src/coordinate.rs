//! Stamp coordinates: the viewpoint a query is resolved from.
//!
//! A coordinate bundles the allowed statuses, the position (path + time
//! ceiling), optional author/module filters, a module preference order for
//! tie-breaking, and the precedence policy. Coordinates are immutable;
//! callers derive variants with the `with_*` methods.

use std::collections::BTreeSet;

use crate::stamp::{Nid, StatusSet, LATEST_TIME};

/// Which dimension wins when two stamps are compared across paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Path ancestry wins over raw time.
    Path,
    /// Raw timestamp wins; path ancestry then module preference break ties.
    Time,
}

/// A per-path time ceiling: nothing after `time` on `path` is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampPosition {
    pub path: Nid,
    pub time: i64,
}

impl StampPosition {
    pub const fn new(path: Nid, time: i64) -> Self {
        Self { path, time }
    }

    /// Position meaning "everything committed on `path`".
    pub const fn latest_on(path: Nid) -> Self {
        Self::new(path, LATEST_TIME)
    }

    pub const fn is_latest(&self) -> bool {
        self.time == LATEST_TIME
    }
}

/// The full view/query object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampCoordinate {
    pub allowed: StatusSet,
    pub position: StampPosition,
    /// Ordered module preference, most preferred first. Used only for
    /// tie-breaking under [`Precedence::Time`] and by the tie-break ordering
    /// API; an empty list means "no preference".
    pub module_priority: Vec<Nid>,
    pub module_filter: Option<BTreeSet<Nid>>,
    pub author_filter: Option<BTreeSet<Nid>>,
    pub precedence: Precedence,
}

impl StampCoordinate {
    pub fn new(allowed: StatusSet, position: StampPosition, precedence: Precedence) -> Self {
        Self {
            allowed,
            position,
            module_priority: Vec::new(),
            module_filter: None,
            author_filter: None,
            precedence,
        }
    }

    /// The common case: active content at the latest point of `path`, path
    /// precedence.
    pub fn latest_active_on(path: Nid) -> Self {
        Self::new(
            StatusSet::active_only(),
            StampPosition::latest_on(path),
            Precedence::Path,
        )
    }

    pub fn with_allowed(mut self, allowed: StatusSet) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn with_position(mut self, position: StampPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_module_priority(mut self, modules: Vec<Nid>) -> Self {
        self.module_priority = modules;
        self
    }

    pub fn with_module_filter(mut self, modules: impl IntoIterator<Item = Nid>) -> Self {
        self.module_filter = Some(modules.into_iter().collect());
        self
    }

    pub fn with_author_filter(mut self, authors: impl IntoIterator<Item = Nid>) -> Self {
        self.author_filter = Some(authors.into_iter().collect());
        self
    }

    /// Index of `module` in the preference order; `None` when unranked.
    pub fn module_rank(&self, module: Nid) -> Option<usize> {
        self.module_priority.iter().position(|&m| m == module)
    }

    pub fn permits_module(&self, module: Nid) -> bool {
        self.module_filter
            .as_ref()
            .map_or(true, |f| f.contains(&module))
    }

    pub fn permits_author(&self, author: Nid) -> bool {
        self.author_filter
            .as_ref()
            .map_or(true, |f| f.contains(&author))
    }
}
