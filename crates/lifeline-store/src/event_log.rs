//! Per-user, append-only event logs.
//!
//! Each `(user, kind)` pair owns one JSON array blob, newest entry first.
//! SOS records, fall events, and booked checkups all share this layout.
//! An append is a read-modify-write of the whole array. To keep two
//! in-process writers from losing each other's entries, every
//! read-modify-write of a key runs under that key's async mutex. Writers
//! in other processes are not coordinated (single-writer deployment).
//!
//! Logs are created lazily by the first append and never deleted. Entries
//! are never modified after they are written; the only removal is the
//! configured [`RetentionPolicy`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lifeline_types::{Checkup, EventKind, FallEvent, SosRecord, UserId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::keys::{log_key, report_index_key};
use crate::kv::KvStore;
use crate::retention::RetentionPolicy;

/// A record that can live in a per-user event log.
pub trait LogRecord: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Which log this record type is appended to.
    const KIND: EventKind;

    /// When the record was created.
    fn recorded_at(&self) -> DateTime<Utc>;
}

impl LogRecord for SosRecord {
    const KIND: EventKind = EventKind::Sos;

    fn recorded_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl LogRecord for FallEvent {
    const KIND: EventKind = EventKind::Fall;

    fn recorded_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl LogRecord for Checkup {
    const KIND: EventKind = EventKind::Checkup;

    fn recorded_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }
}

/// Append-only log store over any [`KvStore`] backend.
pub struct EventLogStore<S> {
    kv: S,
    retention: RetentionPolicy,
    locks: Mutex<BTreeMap<String, Arc<Mutex<()>>>>,
}

impl<S: KvStore> EventLogStore<S> {
    /// Create a log store with unbounded retention.
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            retention: RetentionPolicy::Unbounded,
            locks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Set the retention policy applied after every append.
    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// The retention policy in force.
    pub const fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// The underlying backend.
    pub const fn kv(&self) -> &S {
        &self.kv
    }

    /// Prepend `record` to the user's log and return the updated log,
    /// newest first.
    ///
    /// The write has completed when this returns `Ok`. On `Err` the log is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the backend cannot be reached,
    /// or [`StoreError::Serialization`] if the stored blob is corrupt.
    pub async fn append<R: LogRecord>(
        &self,
        user_id: &UserId,
        record: R,
    ) -> Result<Vec<R>, StoreError> {
        let key = log_key(R::KIND, user_id);
        let lock = self.lock_for(&key).await;
        let _guard = lock.lock().await;

        let mut log: Vec<R> = self.read_key(&key).await?;
        log.insert(0, record);
        self.retention.apply(&mut log);
        let blob = serde_json::to_string(&log)?;

        // Index first: a stale index entry only costs an empty read later.
        self.kv
            .add_member(&report_index_key(R::KIND), user_id.as_str())
            .await?;
        self.kv.set(&key, blob).await?;

        tracing::debug!(
            user_id = %user_id,
            kind = R::KIND.as_str(),
            entries = log.len(),
            "Appended log entry"
        );
        Ok(log)
    }

    /// Every entry in the user's log, newest first.
    ///
    /// A user that never appended gets an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the backend cannot be reached,
    /// or [`StoreError::Serialization`] if the stored blob is corrupt.
    pub async fn read_all<R: LogRecord>(&self, user_id: &UserId) -> Result<Vec<R>, StoreError> {
        self.read_key(&log_key(R::KIND, user_id)).await
    }

    /// Users that have appended at least one entry of `kind`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the backend cannot be reached.
    pub async fn users_with(&self, kind: EventKind) -> Result<Vec<UserId>, StoreError> {
        let members = self.kv.members(&report_index_key(kind)).await?;
        let unique: BTreeSet<String> = members.into_iter().collect();
        Ok(unique.into_iter().map(UserId::from).collect())
    }

    async fn read_key<R: LogRecord>(&self, key: &str) -> Result<Vec<R>, StoreError> {
        match self.kv.get(key).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(key.to_owned()).or_default())
    }
}
