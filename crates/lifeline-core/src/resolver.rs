//! The emergency event resolver.
//!
//! An SOS trigger runs one short, linear flow:
//!
//! ```text
//! Idle -> AcquiringPosition -> ResolvingFacility -> Persisting -> Dispatched
//! ```
//!
//! The position is acquired (bounded by a timeout), the nearest facility is
//! chosen, the [`SosRecord`] is appended to the user's log, and only then is
//! a [`DispatchTicket`] returned. The caller confirms the ticket to dial the
//! facility. A refused permission ends the flow in `Denied` with nothing
//! written. Every failure is returned to the caller; nothing is retried.
//!
//! A fall trigger shares the position step and appends a [`FallEvent`].
//! Booking a [`Checkup`] needs no position; it only checks the facility
//! against the directory.

use std::time::Duration;

use lifeline_geo::{FacilityDirectory, GeoError};
use lifeline_store::{EventLogStore, KvStore, StoreError};
use chrono::NaiveDate;
use lifeline_types::{
    Checkup, Coordinate, DispatchId, DispatchState, Facility, FacilityId, FallEvent, SosRecord,
    UserId, UserProfile,
};
use serde::Serialize;

use crate::clock::MonotonicClock;
use crate::dial::{Dialer, tel_uri};
use crate::position::{PositionError, PositionProvider};

/// Default upper bound on position acquisition.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by the resolver. Each one reaches the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The user refused location permission.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider failed or did not answer in time.
    #[error("position unavailable: {0}")]
    PositionUnavailable(PositionError),

    /// The facility directory is empty.
    #[error("no facilities configured")]
    NoFacilitiesConfigured,

    /// The facility id is not in the directory.
    #[error("unknown facility: {0}")]
    UnknownFacility(FacilityId),

    /// The event log could not be written or read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request itself is unusable (for example a blank user id).
    #[error("precondition violation: {0}")]
    Precondition(String),
}

impl From<PositionError> for ResolverError {
    fn from(error: PositionError) -> Self {
        match error {
            PositionError::PermissionDenied => Self::PermissionDenied,
            other => Self::PositionUnavailable(other),
        }
    }
}

impl From<GeoError> for ResolverError {
    fn from(error: GeoError) -> Self {
        match error {
            GeoError::EmptyCandidates => Self::NoFacilitiesConfigured,
            other => Self::Precondition(other.to_string()),
        }
    }
}

/// A persisted SOS, ready for the caller to dial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchTicket {
    /// Correlates log lines for this dispatch.
    pub dispatch_id: DispatchId,
    /// The nearest facility.
    pub facility: Facility,
    /// The record that was appended to the user's SOS log.
    pub record: SosRecord,
    /// Distance from the user to the facility in kilometres.
    pub distance_km: f64,
    /// `Dispatched`, or `CancelledByUser` after [`cancel`](Self::cancel).
    pub state: DispatchState,
    /// Set once the facility has been dialed.
    #[serde(skip)]
    confirmed: bool,
}

impl DispatchTicket {
    /// `tel:` URI for the facility phone.
    pub fn tel_uri(&self) -> String {
        tel_uri(&self.facility.phone)
    }

    /// Whether the facility has been dialed.
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Dial the facility. Does nothing once the ticket is cancelled or
    /// already confirmed.
    ///
    /// Returns whether a dial was issued.
    pub fn confirm<D: Dialer + ?Sized>(&mut self, dialer: &D) -> bool {
        if self.confirmed || self.state != DispatchState::Dispatched {
            return false;
        }
        tracing::info!(
            dispatch_id = %self.dispatch_id,
            facility_id = %self.facility.id,
            "Dispatch confirmed"
        );
        dialer.dial(&self.facility.phone);
        self.confirmed = true;
        true
    }

    /// Cancel during the confirmation window, which closes once the
    /// facility has been dialed.
    ///
    /// The SOS record stays in the log. Returns whether the state changed.
    pub fn cancel(&mut self) -> bool {
        if self.confirmed || !self.state.can_transition_to(DispatchState::CancelledByUser) {
            return false;
        }
        log_transition(
            &self.dispatch_id,
            &self.record.user_id,
            self.state,
            DispatchState::CancelledByUser,
        );
        self.state = DispatchState::CancelledByUser;
        true
    }
}

/// Resolves SOS and fall triggers against a facility directory and a log store.
pub struct EmergencyResolver<S> {
    directory: FacilityDirectory,
    store: EventLogStore<S>,
    clock: MonotonicClock,
    position_timeout: Duration,
}

impl<S: KvStore> EmergencyResolver<S> {
    /// Create a resolver with the default position timeout.
    pub fn new(directory: FacilityDirectory, store: EventLogStore<S>) -> Self {
        Self {
            directory,
            store,
            clock: MonotonicClock::new(),
            position_timeout: DEFAULT_POSITION_TIMEOUT,
        }
    }

    /// Override the position timeout.
    #[must_use]
    pub fn with_position_timeout(mut self, timeout: Duration) -> Self {
        self.position_timeout = timeout;
        self
    }

    /// The facility directory searched on every SOS.
    pub const fn directory(&self) -> &FacilityDirectory {
        &self.directory
    }

    /// The event log store.
    pub const fn store(&self) -> &EventLogStore<S> {
        &self.store
    }

    /// The configured position timeout.
    pub const fn position_timeout(&self) -> Duration {
        self.position_timeout
    }

    /// Resolve the nearest facility for `profile` and persist the SOS.
    ///
    /// Returns only after the record is durable. On any error nothing has
    /// been written.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::PermissionDenied`] if location was refused.
    /// - [`ResolverError::PositionUnavailable`] on provider failure or timeout.
    /// - [`ResolverError::NoFacilitiesConfigured`] if the directory is empty.
    /// - [`ResolverError::Store`] if the append fails.
    /// - [`ResolverError::Precondition`] for a blank user id.
    pub async fn resolve_and_dispatch<P>(
        &self,
        profile: &UserProfile,
        provider: &P,
    ) -> Result<DispatchTicket, ResolverError>
    where
        P: PositionProvider,
    {
        check_user(&profile.user_id)?;
        let dispatch_id = DispatchId::new();
        let user_id = &profile.user_id;

        log_transition(
            &dispatch_id,
            user_id,
            DispatchState::Idle,
            DispatchState::AcquiringPosition,
        );
        let position = match self.acquire_position(provider).await {
            Ok(position) => position,
            Err(ResolverError::PermissionDenied) => {
                log_transition(
                    &dispatch_id,
                    user_id,
                    DispatchState::AcquiringPosition,
                    DispatchState::Denied,
                );
                tracing::warn!(
                    dispatch_id = %dispatch_id,
                    user_id = %user_id,
                    "SOS denied: location permission refused"
                );
                return Err(ResolverError::PermissionDenied);
            }
            Err(e) => {
                tracing::warn!(
                    dispatch_id = %dispatch_id,
                    user_id = %user_id,
                    error = %e,
                    "SOS aborted: no position"
                );
                return Err(e);
            }
        };

        log_transition(
            &dispatch_id,
            user_id,
            DispatchState::AcquiringPosition,
            DispatchState::ResolvingFacility,
        );
        let nearest = self.directory.nearest(position).map_err(|e| {
            tracing::warn!(dispatch_id = %dispatch_id, error = %e, "SOS aborted: no facility");
            ResolverError::from(e)
        })?;
        let facility = nearest.facility.clone();
        let distance_km = nearest.distance_km;

        log_transition(
            &dispatch_id,
            user_id,
            DispatchState::ResolvingFacility,
            DispatchState::Persisting,
        );
        let record = SosRecord::new(profile, &facility, self.clock.now(), position);
        self.store
            .append(user_id, record.clone())
            .await
            .map_err(|e| {
                tracing::error!(
                    dispatch_id = %dispatch_id,
                    user_id = %user_id,
                    error = %e,
                    "SOS record not persisted"
                );
                ResolverError::from(e)
            })?;

        log_transition(
            &dispatch_id,
            user_id,
            DispatchState::Persisting,
            DispatchState::Dispatched,
        );
        tracing::info!(
            dispatch_id = %dispatch_id,
            user_id = %user_id,
            facility_id = %facility.id,
            distance_km,
            "SOS dispatched"
        );

        Ok(DispatchTicket {
            dispatch_id,
            facility,
            record,
            distance_km,
            state: DispatchState::Dispatched,
            confirmed: false,
        })
    }

    /// Record a fall for `profile` at the current position.
    ///
    /// Returns the user's updated fall log, newest first.
    ///
    /// # Errors
    ///
    /// Same position and store failures as
    /// [`resolve_and_dispatch`](Self::resolve_and_dispatch).
    pub async fn log_fall_event<P>(
        &self,
        profile: &UserProfile,
        provider: &P,
        notes: Option<String>,
    ) -> Result<Vec<FallEvent>, ResolverError>
    where
        P: PositionProvider,
    {
        check_user(&profile.user_id)?;
        let position = self.acquire_position(provider).await.inspect_err(|e| {
            tracing::warn!(user_id = %profile.user_id, error = %e, "Fall not logged: no position");
        })?;

        let event = FallEvent {
            timestamp: self.clock.now(),
            position,
            notes,
        };
        let log = self.store.append(&profile.user_id, event).await?;
        tracing::info!(user_id = %profile.user_id, entries = log.len(), "Fall event logged");
        Ok(log)
    }

    /// Book a checkup for `user_id` at a facility from the directory.
    ///
    /// Returns the user's updated checkup list, newest booking first.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::UnknownFacility`] if `facility_id` is not listed.
    /// - [`ResolverError::Store`] if the append fails.
    /// - [`ResolverError::Precondition`] for a blank user id.
    pub async fn schedule_checkup(
        &self,
        user_id: &UserId,
        facility_id: &FacilityId,
        date: NaiveDate,
    ) -> Result<Vec<Checkup>, ResolverError> {
        check_user(user_id)?;
        let facility = self
            .directory
            .get(facility_id)
            .ok_or_else(|| ResolverError::UnknownFacility(facility_id.clone()))?;

        let checkup = Checkup::new(facility, date, self.clock.now());
        let checkups = self.store.append(user_id, checkup).await?;
        tracing::info!(
            user_id = %user_id,
            facility_id = %facility_id,
            %date,
            "Checkup scheduled"
        );
        Ok(checkups)
    }

    async fn acquire_position<P>(&self, provider: &P) -> Result<Coordinate, ResolverError>
    where
        P: PositionProvider,
    {
        match tokio::time::timeout(self.position_timeout, provider.current_position()).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => {
                let timeout_ms =
                    u64::try_from(self.position_timeout.as_millis()).unwrap_or(u64::MAX);
                Err(PositionError::Timeout { timeout_ms }.into())
            }
        }
    }
}

fn check_user(user_id: &UserId) -> Result<(), ResolverError> {
    if user_id.as_str().trim().is_empty() {
        return Err(ResolverError::Precondition(
            "user id must not be blank".to_owned(),
        ));
    }
    Ok(())
}

fn log_transition(
    dispatch_id: &DispatchId,
    user_id: &UserId,
    from: DispatchState,
    to: DispatchState,
) {
    if from.can_transition_to(to) {
        tracing::debug!(%dispatch_id, %user_id, ?from, ?to, "Dispatch state");
    } else {
        tracing::warn!(%dispatch_id, %user_id, ?from, ?to, "Illegal dispatch state transition");
    }
}
