//! REST API endpoint handlers.
//!
//! Every user-scoped handler takes the user id from the path. Nothing is
//! looked up from a session.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness and backend name |
//! | `GET` | `/api/facilities` | Facility directory in search order |
//! | `PUT` | `/api/users/:id/profile` | Store a profile |
//! | `GET` | `/api/users/:id/profile` | Read a profile |
//! | `POST` | `/api/users/:id/sos` | Resolve, persist, and dial |
//! | `GET` | `/api/users/:id/sos` | SOS log, newest first |
//! | `POST` | `/api/users/:id/falls` | Log a fall |
//! | `GET` | `/api/users/:id/falls` | Fall log, newest first |
//! | `POST` | `/api/users/:id/checkups` | Book a checkup at a listed facility |
//! | `GET` | `/api/users/:id/checkups` | Booked checkups, newest first |
//! | `GET` | `/api/reports/sos` | SOS summary across users |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use lifeline_core::ReportedPosition;
use lifeline_types::{Checkup, FacilityId, FallEvent, SosRecord, UserId, UserProfile};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Outcome of the device's location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    /// Permission granted; `latitude` and `longitude` are required.
    Granted,
    /// Permission refused.
    Denied,
    /// The device could not get a fix; `message` explains why.
    Error,
}

/// Position report sent by the client with an SOS or fall.
///
/// Coordinates are only checked when `status` is `granted`; a refused or
/// failed request may still carry a stale fix.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PositionBody {
    /// Permission outcome.
    pub status: PositionStatus,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Device-side error description.
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

#[derive(Debug, Validate)]
struct GrantedFix {
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: f64,
}

impl PositionBody {
    /// Validate and convert into a position provider.
    pub fn into_reported(self) -> Result<ReportedPosition, ApiError> {
        self.validate()?;
        match (self.status, self.latitude, self.longitude) {
            (PositionStatus::Granted, Some(latitude), Some(longitude)) => {
                let fix = GrantedFix {
                    latitude,
                    longitude,
                };
                fix.validate()?;
                Ok(ReportedPosition::Granted {
                    latitude: fix.latitude,
                    longitude: fix.longitude,
                })
            }
            (PositionStatus::Granted, _, _) => Err(ApiError::BadRequest(
                "granted position requires latitude and longitude".to_owned(),
            )),
            (PositionStatus::Denied, _, _) => Ok(ReportedPosition::Denied),
            (PositionStatus::Error, _, _) => Ok(ReportedPosition::Error {
                message: self
                    .message
                    .unwrap_or_else(|| "position unavailable".to_owned()),
            }),
        }
    }
}

/// Body of `POST /api/users/:id/falls`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FallBody {
    /// Where the fall happened.
    #[serde(flatten)]
    #[validate(nested)]
    pub position: PositionBody,
    /// Free-text notes.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Body of `POST /api/users/:id/checkups`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckupBody {
    /// Directory id of the facility to book.
    pub facility_id: FacilityId,
    /// Day of the visit (`YYYY-MM-DD`).
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness check.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.service_name,
        "backend": state.resolver.store().kv().backend_name(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/facilities
// ---------------------------------------------------------------------------

/// The facility directory in search order.
pub async fn list_facilities(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let facilities = state.resolver.directory().facilities();
    Json(serde_json::json!({
        "count": facilities.len(),
        "facilities": facilities,
    }))
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Store a profile. The body's `user_id` must match the path.
pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(profile): Json<UserProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    if profile.user_id != user_id {
        return Err(ApiError::BadRequest(format!(
            "path user {user_id} does not match body user {}",
            profile.user_id
        )));
    }
    state.profiles().put(&profile).await?;
    Ok(Json(profile))
}

/// Read a profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    Ok(Json(load_profile(&state, &user_id).await?))
}

// ---------------------------------------------------------------------------
// SOS
// ---------------------------------------------------------------------------

/// Resolve the nearest facility, persist the SOS, and dial.
///
/// Responds only after the record is durable.
pub async fn post_sos(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PositionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    let position = body.into_reported()?;
    let profile = load_profile(&state, &user_id).await?;

    let mut ticket = state
        .resolver
        .resolve_and_dispatch(&profile, &position)
        .await?;
    ticket.confirm(state.dialer.as_ref());

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "dispatch_id": ticket.dispatch_id,
            "state": ticket.state,
            "facility": ticket.facility,
            "distance_km": ticket.distance_km,
            "tel_uri": ticket.tel_uri(),
            "record": ticket.record,
        })),
    ))
}

/// The user's SOS log, newest first.
pub async fn list_sos(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    let records: Vec<SosRecord> = state.resolver.store().read_all(&user_id).await?;
    Ok(Json(serde_json::json!({
        "count": records.len(),
        "records": records,
    })))
}

// ---------------------------------------------------------------------------
// Falls
// ---------------------------------------------------------------------------

/// Log a fall and return the updated log.
pub async fn post_fall(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<FallBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    body.validate()?;
    let position = body.position.into_reported()?;
    let profile = load_profile(&state, &user_id).await?;

    let events = state
        .resolver
        .log_fall_event(&profile, &position, body.notes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "count": events.len(),
            "events": events,
        })),
    ))
}

/// The user's fall log, newest first.
pub async fn list_falls(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    let events: Vec<FallEvent> = state.resolver.store().read_all(&user_id).await?;
    Ok(Json(serde_json::json!({
        "count": events.len(),
        "events": events,
    })))
}

// ---------------------------------------------------------------------------
// Checkups
// ---------------------------------------------------------------------------

/// Book a checkup and return the updated list.
pub async fn post_checkup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CheckupBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    load_profile(&state, &user_id).await?;

    let checkups = state
        .resolver
        .schedule_checkup(&user_id, &body.facility_id, body.date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "count": checkups.len(),
            "checkups": checkups,
        })),
    ))
}

/// The user's booked checkups, newest first.
pub async fn list_checkups(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user(&id)?;
    let checkups: Vec<Checkup> = state.resolver.store().read_all(&user_id).await?;
    Ok(Json(serde_json::json!({
        "count": checkups.len(),
        "checkups": checkups,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/reports/sos
// ---------------------------------------------------------------------------

/// SOS summary across all users.
pub async fn sos_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.resolver.store().sos_report().await?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_user(id: &str) -> Result<UserId, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("user id must not be blank".to_owned()));
    }
    Ok(UserId::from(trimmed))
}

async fn load_profile(state: &AppState, user_id: &UserId) -> Result<UserProfile, ApiError> {
    state
        .profiles()
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("profile for user {user_id}")))
}
