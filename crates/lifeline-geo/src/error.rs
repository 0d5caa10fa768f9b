//! Error types for the `lifeline-geo` crate.
//!
//! All fallible operations in this crate return [`GeoError`].

use lifeline_types::{Coordinate, FacilityId};

/// Errors that can occur during distance and directory operations.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// `nearest` was called with no candidates. This is a precondition
    /// violation, never answered with a default facility.
    #[error("precondition violation: nearest() needs at least one candidate")]
    EmptyCandidates,

    /// A directory was built with two facilities sharing one id.
    #[error("duplicate facility id: {0}")]
    DuplicateFacility(FacilityId),

    /// A coordinate lies outside latitude `[-90, 90]` or longitude `[-180, 180]`.
    #[error("coordinate out of range: lat {}, lon {}", .0.latitude, .0.longitude)]
    CoordinateOutOfRange(Coordinate),
}
