//! Integration tests for the `lifeline-store` data layer.
//!
//! The in-memory tests always run. The Dragonfly tests require a live
//! instance and are marked `#[ignore]`:
//!
//! ```bash
//! docker compose up -d
//! cargo test -p lifeline-store -- --ignored
//! docker compose down
//! ```

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use chrono::Utc;
use lifeline_store::{
    AnyKv, DragonflyKv, EventLogStore, KvStore, MemoryKv, ProfileStore, RetentionPolicy,
};
use lifeline_types::{
    Coordinate, EventKind, Facility, FacilityId, FallEvent, Role, SosRecord, UserId, UserProfile,
};

/// Dragonfly connection URL for the local Docker instance.
const DRAGONFLY_URL: &str = "redis://localhost:6379";

fn fall(note: &str) -> FallEvent {
    FallEvent {
        timestamp: Utc::now(),
        position: Coordinate::new(8.4822, 124.6455),
        notes: Some(note.to_owned()),
    }
}

fn profile(id: &str) -> UserProfile {
    UserProfile {
        user_id: UserId::from(id),
        first_name: String::from("Ana"),
        middle_name: None,
        last_name: String::from("Reyes"),
        email: format!("{id}@example.com"),
        role: Role::Patient,
        age: Some(71),
        gender: None,
        condition: None,
    }
}

fn tablon() -> Facility {
    Facility {
        id: FacilityId::from("2"),
        name: String::from("Tablon Clinic"),
        phone: String::from("09179876543"),
        location: Coordinate::new(8.4822, 124.6455),
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

#[tokio::test]
async fn concurrent_appends_lose_no_entries() {
    let store = Arc::new(EventLogStore::new(MemoryKv::new()));
    let user = UserId::from("ana");

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = Arc::clone(&store);
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            store.append(&user, fall(&format!("writer {i}"))).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let log: Vec<FallEvent> = store.read_all(&user).await.unwrap();
    assert_eq!(log.len(), 32);
}

#[tokio::test]
async fn any_kv_dispatches_to_memory() {
    let kv = AnyKv::from(MemoryKv::new());
    assert_eq!(kv.backend_name(), "memory");

    let store = EventLogStore::new(kv);
    let user = UserId::from("ana");
    let record = SosRecord::new(&profile("ana"), &tablon(), Utc::now(), tablon().location);
    store.append(&user, record).await.unwrap();

    let users = store.users_with(EventKind::Sos).await.unwrap();
    assert_eq!(users, vec![user]);
}

#[tokio::test]
async fn keep_last_survives_many_writers() {
    let store = Arc::new(
        EventLogStore::new(MemoryKv::new()).with_retention(RetentionPolicy::KeepLast { count: 5 }),
    );
    let user = UserId::from("ana");

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            store.append(&user, fall(&format!("writer {i}"))).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let log: Vec<FallEvent> = store.read_all(&user).await.unwrap();
    assert_eq!(log.len(), 5);
}

// =============================================================================
// Dragonfly backend
// =============================================================================

async fn setup_dragonfly() -> DragonflyKv {
    let kv = DragonflyKv::connect(DRAGONFLY_URL)
        .await
        .expect("Failed to connect to Dragonfly -- is Docker running?");
    kv.flush_all().await.expect("Failed to flush Dragonfly");
    kv
}

#[tokio::test]
#[ignore = "requires a running Dragonfly instance"]
async fn dragonfly_set_get_roundtrip() {
    let kv = setup_dragonfly().await;
    kv.set("user:ping", String::from("{}")).await.unwrap();
    assert_eq!(kv.get("user:ping").await.unwrap().as_deref(), Some("{}"));
    assert!(kv.get("user:missing").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running Dragonfly instance"]
async fn dragonfly_event_logs_and_index() {
    let kv = setup_dragonfly().await;
    let store = EventLogStore::new(kv);
    let user = UserId::from("ana");

    store.append(&user, fall("first")).await.unwrap();
    store.append(&user, fall("second")).await.unwrap();

    let log: Vec<FallEvent> = store.read_all(&user).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].notes.as_deref(), Some("second"));

    let users = store.users_with(EventKind::Fall).await.unwrap();
    assert_eq!(users, vec![user]);
}

#[tokio::test]
#[ignore = "requires a running Dragonfly instance"]
async fn dragonfly_profiles() {
    let kv = setup_dragonfly().await;
    let profiles = ProfileStore::new(&kv);
    profiles.put(&profile("ana")).await.unwrap();

    let loaded = profiles.get(&UserId::from("ana")).await.unwrap();
    assert_eq!(loaded, Some(profile("ana")));
}
