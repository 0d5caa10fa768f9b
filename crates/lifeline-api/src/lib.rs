//! Request API for the Lifeline emergency resolver.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **SOS dispatch** (`POST /api/users/{id}/sos`): resolve the nearest
//!   facility from a client-reported position, persist the record, and
//!   return the facility with its `tel:` URI
//! - **Fall logging** (`POST /api/users/{id}/falls`)
//! - **Checkup booking** (`POST /api/users/{id}/checkups`) at a listed facility
//! - **Log reads** for every per-user log, newest first
//! - **Profiles** and the **facility directory**
//! - **SOS report** summarising every user's dispatches
//!
//! # Architecture
//!
//! Handlers are thin: they parse the path and body, load the caller's
//! profile, and delegate to the shared [`EmergencyResolver`]. Errors map
//! to HTTP statuses in [`error::ApiError`].
//!
//! [`EmergencyResolver`]: lifeline_core::EmergencyResolver

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve_until, start_server};
pub use state::AppState;
