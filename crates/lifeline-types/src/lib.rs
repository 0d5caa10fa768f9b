//! Shared type definitions for the Lifeline emergency resolver.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the mobile app.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for user, facility, and dispatch ids
//! - [`enums`] -- Event kinds, user roles, and the dispatch state machine
//! - [`structs`] -- Coordinates, facilities, profiles, event records, and checkups

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DispatchState, EventKind, Role};
pub use ids::{DispatchId, FacilityId, UserId};
pub use structs::{
    Checkup, Coordinate, DEFAULT_SOS_AGE, DEFAULT_SOS_CONDITION, DEFAULT_SOS_GENDER, Facility,
    FallEvent, SosRecord, UserProfile,
};
