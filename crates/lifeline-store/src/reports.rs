//! Cross-user SOS report summary.
//!
//! Collects every SOS record from every user that has dispatched at least
//! once and summarises them for the clinician reports screen.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lifeline_types::{EventKind, SosRecord, UserId};
use serde::Serialize;

use crate::error::StoreError;
use crate::event_log::EventLogStore;
use crate::kv::KvStore;

/// Summary of all SOS dispatches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SosReport {
    /// Number of SOS records across all users.
    pub total_requests: usize,
    /// Number of distinct users among those records.
    pub unique_patients: usize,
    /// Timestamp of the most recent record, if any.
    pub latest_request: Option<DateTime<Utc>>,
    /// All records, newest first.
    pub requests: Vec<SosRecord>,
}

impl SosReport {
    /// Summarise a set of records in any order.
    pub fn from_records(mut requests: Vec<SosRecord>) -> Self {
        requests.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let unique: BTreeSet<&UserId> = requests.iter().map(|r| &r.user_id).collect();
        Self {
            total_requests: requests.len(),
            unique_patients: unique.len(),
            latest_request: requests.first().map(|r| r.timestamp),
            requests,
        }
    }
}

impl<S: KvStore> EventLogStore<S> {
    /// Build the SOS report across every indexed user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the index or any user's log cannot be read.
    pub async fn sos_report(&self) -> Result<SosReport, StoreError> {
        let mut requests = Vec::new();
        for user_id in self.users_with(EventKind::Sos).await? {
            let log: Vec<SosRecord> = self.read_all(&user_id).await?;
            requests.extend(log);
        }
        Ok(SosReport::from_records(requests))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use lifeline_types::{Coordinate, FacilityId};

    use super::*;
    use crate::memory::MemoryKv;

    fn sos(user: &str, offset_secs: i64) -> SosRecord {
        SosRecord {
            user_id: UserId::from(user),
            user_display_name: user.to_owned(),
            age: 0,
            gender: String::from("Unknown"),
            condition_tag: String::from("Critical"),
            facility_id: FacilityId::from("1"),
            facility_name: String::from("Carmen Clinic"),
            timestamp: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(offset_secs),
            position: Coordinate::new(8.45, 124.63),
        }
    }

    #[test]
    fn empty_report() {
        let report = SosReport::from_records(Vec::new());
        assert_eq!(report.total_requests, 0);
        assert_eq!(report.unique_patients, 0);
        assert!(report.latest_request.is_none());
    }

    #[test]
    fn counts_and_orders_records() {
        let report = SosReport::from_records(vec![sos("a", 10), sos("b", 30), sos("a", 20)]);
        assert_eq!(report.total_requests, 3);
        assert_eq!(report.unique_patients, 2);
        assert_eq!(report.latest_request.map(|t| t.timestamp()), Some(30));
        let order: Vec<i64> = report.requests.iter().map(|r| r.timestamp.timestamp()).collect();
        assert_eq!(order, vec![30, 20, 10]);
    }

    #[tokio::test]
    async fn report_spans_all_users() {
        let store = EventLogStore::new(MemoryKv::new());
        assert!(store.append(&UserId::from("a"), sos("a", 1)).await.is_ok());
        assert!(store.append(&UserId::from("b"), sos("b", 2)).await.is_ok());
        assert!(store.append(&UserId::from("a"), sos("a", 3)).await.is_ok());

        let report = store.sos_report().await;
        assert!(report.is_ok());
        if let Ok(report) = report {
            assert_eq!(report.total_requests, 3);
            assert_eq!(report.unique_patients, 2);
        }
    }
}
