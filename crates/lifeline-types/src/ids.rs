//! Type-safe identifier wrappers.
//!
//! Users and facilities are identified by opaque strings supplied from
//! outside (an account key, a directory entry), so their ids wrap
//! [`String`]. Dispatch attempts are minted here and use UUID v7
//! (time-ordered) so log lines sort by creation time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

/// Generates a newtype wrapper around an opaque external [`String`] key.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_key! {
    /// Identifier of an app user (patient or clinician). In the mobile app
    /// this is the account e-mail address.
    UserId
}

define_key! {
    /// Identifier of a facility in the static directory.
    FacilityId
}

define_id! {
    /// Correlation id for a single SOS dispatch attempt.
    DispatchId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_serializes_as_bare_string() {
        let id = UserId::new("ana@example.com");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"ana@example.com\""));
    }

    #[test]
    fn facility_id_display_is_raw_key() {
        let id = FacilityId::from("2");
        assert_eq!(id.to_string(), "2");
        assert_eq!(id.as_str(), "2");
    }

    #[test]
    fn dispatch_ids_are_unique() {
        let first = DispatchId::new();
        let second = DispatchId::new();
        assert_ne!(first.into_inner(), Uuid::nil());
        assert_ne!(first, second);
    }
}
