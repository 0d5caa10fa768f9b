//! Emergency event resolution for Lifeline.
//!
//! This crate owns the SOS and fall flows: acquire a position, pick the
//! nearest facility, persist the record, and hand the caller a ticket to
//! dial. It also books checkups and loads the service configuration.
//!
//! # Modules
//!
//! - [`resolver`] -- [`EmergencyResolver`] with `resolve_and_dispatch`,
//!   `log_fall_event`, and `schedule_checkup`, plus the [`DispatchTicket`]
//!   it returns.
//! - [`position`] -- [`PositionProvider`] trait, a fixed provider, and the
//!   client-reported position.
//! - [`dial`] -- Fire-and-forget [`Dialer`] and `tel:` URIs.
//! - [`clock`] -- Strictly increasing UTC timestamps.
//! - [`config`] -- Configuration loading from `lifeline-config.yaml` into
//!   strongly-typed structs.
//!
//! [`EmergencyResolver`]: resolver::EmergencyResolver
//! [`DispatchTicket`]: resolver::DispatchTicket
//! [`PositionProvider`]: position::PositionProvider
//! [`Dialer`]: dial::Dialer

pub mod clock;
pub mod config;
pub mod dial;
pub mod position;
pub mod resolver;

pub use config::{ConfigError, LifelineConfig, StoreBackend};
pub use dial::{Dialer, TracingDialer, tel_uri};
pub use position::{FixedPosition, PositionError, PositionProvider, ReportedPosition};
pub use resolver::{DispatchTicket, EmergencyResolver, ResolverError};
