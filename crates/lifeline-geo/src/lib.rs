//! Geography for the Lifeline emergency resolver.
//!
//! Pure, synchronous code: great-circle distances, nearest-facility
//! selection, and the read-only facility directory the resolver searches.
//!
//! # Modules
//!
//! - [`distance`] -- Haversine distance with `R = 6371 km` and coordinate
//!   range validation.
//! - [`nearest`] -- Linear minimum-distance scan with first-wins tie-break.
//! - [`directory`] -- [`FacilityDirectory`], an `Arc`-shared ordered set of
//!   facilities with the default clinic seed.
//! - [`error`] -- Error types for geo operations.

pub mod directory;
pub mod distance;
pub mod error;
pub mod nearest;

// Re-export primary types at crate root.
pub use directory::{FacilityDirectory, default_facilities};
pub use distance::{EARTH_RADIUS_KM, distance_km, validate_coordinate};
pub use error::GeoError;
pub use nearest::{Nearest, nearest};
