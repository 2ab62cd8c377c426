//! Bitemporal, path-branching version store for terminology components.
//!
//! The resolution engine lives in `veristamp-core`; this crate owns the
//! shared state (stamp pool, path graph, identity registry, chronicles) and
//! exposes the store operations the presentation, workflow and persistence
//! layers consume.

pub mod identity;
pub mod store;

pub use identity::IdentityService;
pub use store::VersionStore;

pub use veristamp_core::{
    categorize, ordered_with_tiebreak, resolve_latest, visible_ordered_versions,
    CategorizedVersions, Chronicle, DynamicField, LatestVersion, Nid, PathGraph, PathMap,
    PathOrigin, Precedence, RelativePosition, RelativePositionCalculator, Stamp, StampCoordinate,
    StampPool, StampPosition, StampSeq, Stamped, Status, StatusSet, Version, VersionCategory,
    VersionData, VersionError, LATEST_TIME, UNCOMMITTED_TIME,
};
