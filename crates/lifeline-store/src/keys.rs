//! Key layout for the key-value backend.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `fallLogs:{userId}` | JSON array | Fall events, newest first |
//! | `sos:{userId}` | JSON array | SOS records, newest first |
//! | `checkups:{userId}` | JSON array | Booked checkups, newest first |
//! | `user:{userId}` | JSON | User profile |
//! | `reports:{kind}` | Set | Users that have at least one entry of `kind` |

use lifeline_types::{EventKind, UserId};

/// Top-level key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Fall-event logs.
    FallLogs,
    /// SOS dispatch logs.
    Sos,
    /// Booked checkups.
    Checkups,
    /// User profiles.
    User,
    /// Cross-user report indexes.
    Reports,
}

impl Namespace {
    /// The key prefix as written to the store.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::FallLogs => "fallLogs",
            Self::Sos => "sos",
            Self::Checkups => "checkups",
            Self::User => "user",
            Self::Reports => "reports",
        }
    }

    /// The namespace an event log of `kind` lives under.
    pub const fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Sos => Self::Sos,
            EventKind::Fall => Self::FallLogs,
            EventKind::Checkup => Self::Checkups,
        }
    }

    /// `<namespace>:<userId>`.
    pub fn user_key(self, user_id: &UserId) -> String {
        format!("{}:{}", self.prefix(), user_id)
    }
}

/// Key of the log holding `kind` events for `user_id`.
pub fn log_key(kind: EventKind, user_id: &UserId) -> String {
    Namespace::for_kind(kind).user_key(user_id)
}

/// Key of the set indexing every user with a `kind` log.
pub fn report_index_key(kind: EventKind) -> String {
    format!("{}:{}", Namespace::Reports.prefix(), kind.as_str())
}
