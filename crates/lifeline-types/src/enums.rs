//! Enumeration types shared across the resolver, the store, and the API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kinds of per-user log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// SOS dispatch records.
    Sos,
    /// Fall-detection events.
    Fall,
    /// Scheduled checkups.
    Checkup,
}

impl EventKind {
    /// Lowercase label used in log fields and report keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sos => "sos",
            Self::Fall => "fall",
            Self::Checkup => "checkup",
        }
    }
}

/// Account role of an app user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// A patient who can trigger SOS dispatches and fall alerts.
    #[default]
    Patient,
    /// A clinician attached to a facility.
    Clinician,
}

/// Per-invocation state of an SOS dispatch.
///
/// ```text
/// Idle -> AcquiringPosition -> ResolvingFacility -> Persisting -> Dispatched
///   |            |                                                    |
///   +------------+--> Denied                        CancelledByUser <-+
/// ```
///
/// The state is never persisted; it is reported to the caller on the
/// dispatch ticket and emitted in tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DispatchState {
    /// Nothing has happened yet.
    Idle,
    /// Waiting on the position provider.
    AcquiringPosition,
    /// Running the nearest-facility search.
    ResolvingFacility,
    /// Appending the SOS record to the user's log.
    Persisting,
    /// The record is durable and the caller may dial the facility.
    Dispatched,
    /// Position permission was refused.
    Denied,
    /// The user cancelled during the confirmation window. The persisted
    /// record is not retracted.
    CancelledByUser,
}

impl DispatchState {
    /// Whether `next` is a legal successor of `self`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::AcquiringPosition | Self::Denied)
                | (Self::AcquiringPosition, Self::ResolvingFacility | Self::Denied)
                | (Self::ResolvingFacility, Self::Persisting)
                | (Self::Persisting, Self::Dispatched)
                | (Self::Dispatched, Self::CancelledByUser)
        )
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Denied | Self::CancelledByUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        let path = [
            DispatchState::Idle,
            DispatchState::AcquiringPosition,
            DispatchState::ResolvingFacility,
            DispatchState::Persisting,
            DispatchState::Dispatched,
            DispatchState::CancelledByUser,
        ];
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert!(from.can_transition_to(*to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn cannot_skip_persisting() {
        assert!(!DispatchState::ResolvingFacility.can_transition_to(DispatchState::Dispatched));
        assert!(!DispatchState::Denied.can_transition_to(DispatchState::AcquiringPosition));
        assert!(DispatchState::Denied.is_terminal());
        assert!(!DispatchState::Dispatched.is_terminal());
    }

    #[test]
    fn enums_serialize_snake_case() {
        let json = serde_json::to_string(&DispatchState::CancelledByUser).unwrap_or_default();
        assert_eq!(json, "\"cancelled_by_user\"");
        let json = serde_json::to_string(&EventKind::Fall).unwrap_or_default();
        assert_eq!(json, "\"fall\"");
        assert_eq!(EventKind::Sos.as_str(), "sos");
    }
}
