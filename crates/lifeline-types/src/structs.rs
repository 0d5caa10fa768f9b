//! Core data model: coordinates, facilities, user profiles, the two
//! immutable event records (SOS dispatches and falls), and scheduled
//! checkups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Role;
use crate::ids::{FacilityId, UserId};

/// Age recorded on an SOS record when the profile does not carry one.
pub const DEFAULT_SOS_AGE: u32 = 0;

/// Gender recorded on an SOS record when the profile does not carry one.
pub const DEFAULT_SOS_GENDER: &str = "Unknown";

/// Condition tag recorded on an SOS record when the profile does not carry one.
pub const DEFAULT_SOS_CONDITION: &str = "Critical";

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Latitude is expected in `[-90, 90]` and longitude in `[-180, 180]`.
/// The type does not enforce the range on construction; use
/// [`Coordinate::is_within_range`] at trust boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Degrees north of the equator (negative is south).
    pub latitude: f64,
    /// Degrees east of Greenwich (negative is west).
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their valid ranges.
    pub fn is_within_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// A clinic or service location with a dialable phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Facility {
    /// Unique directory key.
    pub id: FacilityId,
    /// Display name.
    pub name: String,
    /// Number handed to the dial action.
    pub phone: String,
    /// Fixed position of the facility.
    pub location: Coordinate,
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// The profile fields the resolver needs from the calling user.
///
/// The profile is always passed explicitly; nothing in the workspace looks
/// up a "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserProfile {
    /// Account key the user's logs are partitioned under.
    pub user_id: UserId,
    /// Given name.
    pub first_name: String,
    /// Middle name, if any.
    #[serde(default)]
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Patient or clinician.
    #[serde(default)]
    pub role: Role,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Primary medical condition.
    #[serde(default)]
    pub condition: Option<String>,
}

impl UserProfile {
    /// `"{first} {last}"` with surrounding whitespace trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

// ---------------------------------------------------------------------------
// SosRecord
// ---------------------------------------------------------------------------

/// Immutable snapshot of an emergency dispatch decision.
///
/// Identified by `(user_id, timestamp)`. Two triggers in quick succession
/// produce two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SosRecord {
    /// The user who triggered the SOS.
    pub user_id: UserId,
    /// Display name at trigger time.
    pub user_display_name: String,
    /// Age at trigger time (0 when unknown).
    pub age: u32,
    /// Gender at trigger time (`"Unknown"` when not set).
    pub gender: String,
    /// Condition tag at trigger time (`"Critical"` when not set).
    pub condition_tag: String,
    /// The facility chosen as dispatch target.
    pub facility_id: FacilityId,
    /// Name of the chosen facility.
    pub facility_name: String,
    /// Trigger time.
    pub timestamp: DateTime<Utc>,
    /// Device position at trigger time.
    pub position: Coordinate,
}

impl SosRecord {
    /// Build a record from the caller's profile and the chosen facility,
    /// filling the profile defaults the mobile app used.
    pub fn new(
        profile: &UserProfile,
        facility: &Facility,
        timestamp: DateTime<Utc>,
        position: Coordinate,
    ) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            user_display_name: profile.display_name(),
            age: profile.age.unwrap_or(DEFAULT_SOS_AGE),
            gender: profile
                .gender
                .clone()
                .unwrap_or_else(|| DEFAULT_SOS_GENDER.to_owned()),
            condition_tag: profile
                .condition
                .clone()
                .unwrap_or_else(|| DEFAULT_SOS_CONDITION.to_owned()),
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            timestamp,
            position,
        }
    }
}

// ---------------------------------------------------------------------------
// FallEvent
// ---------------------------------------------------------------------------

/// A fall-detection event with the device position at detection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FallEvent {
    /// Detection time.
    pub timestamp: DateTime<Utc>,
    /// Device position at detection time.
    pub position: Coordinate,
    /// Free-text notes entered by the user or a caregiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Checkup
// ---------------------------------------------------------------------------

/// A checkup booked with a facility from the directory.
///
/// The facility's name, phone, and location are copied at booking time so
/// the entry still reads correctly if the directory changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Checkup {
    /// Day of the visit.
    pub date: NaiveDate,
    /// The booked facility.
    pub facility_id: FacilityId,
    /// Facility name at booking time.
    pub clinic: String,
    /// Facility phone at booking time.
    pub phone: String,
    /// Facility position at booking time.
    pub location: Coordinate,
    /// When the booking was made.
    pub scheduled_at: DateTime<Utc>,
}

impl Checkup {
    /// Book `facility` for `date`.
    pub fn new(facility: &Facility, date: NaiveDate, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            date,
            facility_id: facility.id.clone(),
            clinic: facility.name.clone(),
            phone: facility.phone.clone(),
            location: facility.location,
            scheduled_at,
        }
    }
}
