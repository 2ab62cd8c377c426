//! STAMP-based version resolution for a path-branching terminology store.
//!
//! Many authors edit the same logical component concurrently on different
//! named branches ("paths"). Given a viewpoint — a [`StampCoordinate`] —
//! this crate decides deterministically which edit is current, which are
//! historical, and which are genuinely concurrent contradictions that must
//! not be silently resolved.

pub mod categorize;
pub mod chronicle;
pub mod coordinate;
pub mod error;
pub mod latest;
pub mod order;
pub mod path;
pub mod pool;
pub mod relative;
pub mod stamp;

pub use categorize::{categorize, CategorizedVersions, VersionCategory};
pub use chronicle::{Chronicle, DynamicField, Version, VersionData};
pub use coordinate::{Precedence, StampCoordinate, StampPosition};
pub use error::VersionError;
pub use latest::{resolve_latest, LatestVersion, Stamped};
pub use order::{ordered_with_tiebreak, visible_ordered_versions};
pub use path::{PathGraph, PathMap, PathOrigin};
pub use pool::StampPool;
pub use relative::{RelativePosition, RelativePositionCalculator};
pub use stamp::{Nid, Stamp, StampSeq, Status, StatusSet, LATEST_TIME, UNCOMMITTED_TIME};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
