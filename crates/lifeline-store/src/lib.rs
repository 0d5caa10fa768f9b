//! Storage layer for the Lifeline emergency resolver.
//!
//! Every user owns two append-only logs (SOS dispatches and fall events)
//! stored as JSON blobs in a key-value backend. The backend is either an
//! in-process map or `Dragonfly` (Redis-compatible).
//!
//! # Architecture
//!
//! ```text
//! Resolver
//!     |
//!     +-- append / read_all --> EventLogStore (per-key locks, retention)
//!     |                             |
//!     +-- profiles -----------> ProfileStore
//!                                   |
//!                                   +--> KvStore: MemoryKv | DragonflyKv
//! ```
//!
//! # Modules
//!
//! - [`kv`] -- The [`KvStore`] backend trait and the runtime-selected [`AnyKv`]
//! - [`memory`] -- In-process backend with an outage switch for tests
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) backend
//! - [`keys`] -- `<namespace>:<userId>` key layout
//! - [`event_log`] -- [`EventLogStore`]: append and read-back of per-user logs
//! - [`retention`] -- Optional log trimming policies
//! - [`profiles`] -- User profile blobs
//! - [`reports`] -- Cross-user SOS summary
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;
pub mod event_log;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod profiles;
pub mod reports;
pub mod retention;

// Re-export primary types for convenience.
pub use dragonfly::DragonflyKv;
pub use error::StoreError;
pub use event_log::{EventLogStore, LogRecord};
pub use keys::Namespace;
pub use kv::{AnyKv, KvStore};
pub use memory::MemoryKv;
pub use profiles::ProfileStore;
pub use reports::SosReport;
pub use retention::RetentionPolicy;
