//! In-process key-value backend.
//!
//! Used by tests and by single-node deployments that accept losing logs
//! on restart. The reachability switch lets tests exercise the
//! "store unavailable" paths without a network.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::kv::KvStore;

#[derive(Debug, Default)]
struct Inner {
    blobs: RwLock<BTreeMap<String, String>>,
    sets: RwLock<BTreeMap<String, BTreeSet<String>>>,
    offline: AtomicBool,
    writes: AtomicU64,
}

/// A cloneable handle to a shared in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    inner: Arc<Inner>,
}

impl MemoryKv {
    /// Create an empty, reachable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend going away (`false`) or coming back (`true`).
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.offline.store(!reachable, Ordering::SeqCst);
    }

    /// Number of successful `set`/`add_member` calls since creation.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn ensure_reachable(&self) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is switched off".to_owned(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.ensure_reachable()?;
        Ok(self.inner.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.ensure_reachable()?;
        self.inner.blobs.write().await.insert(key.to_owned(), value);
        self.record_write();
        Ok(())
    }

    async fn add_member(&self, key: &str, member: &str) -> Result<(), StoreError> {
        self.ensure_reachable()?;
        self.inner
            .sets
            .write()
            .await
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned());
        self.record_write();
        Ok(())
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.ensure_reachable()?;
        Ok(self
            .inner
            .sets
            .read()
            .await
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let kv = MemoryKv::new();
        assert!(matches!(kv.get("sos:nobody").await, Ok(None)));
    }

    #[tokio::test]
    async fn set_then_get_and_count_writes() {
        let kv = MemoryKv::new();
        assert!(kv.set("user:a", String::from("{}")).await.is_ok());
        assert_eq!(kv.get("user:a").await.ok().flatten().as_deref(), Some("{}"));
        assert_eq!(kv.write_count(), 1);
    }

    #[tokio::test]
    async fn sets_are_deduplicated_and_sorted() {
        let kv = MemoryKv::new();
        for member in ["b", "a", "b"] {
            assert!(kv.add_member("reports:sos", member).await.is_ok());
        }
        let members = kv.members("reports:sos").await.unwrap_or_default();
        assert_eq!(members, vec![String::from("a"), String::from("b")]);
        assert!(kv.members("reports:fall").await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() {
        let kv = MemoryKv::new();
        kv.set_reachable(false);
        assert!(matches!(kv.get("k").await, Err(StoreError::Unavailable(_))));
        assert!(matches!(kv.set("k", String::new()).await, Err(StoreError::Unavailable(_))));
        assert_eq!(kv.write_count(), 0);

        kv.set_reachable(true);
        assert!(kv.get("k").await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_contents() {
        let kv = MemoryKv::new();
        let other = kv.clone();
        assert!(kv.set("k", String::from("v")).await.is_ok());
        assert_eq!(other.get("k").await.ok().flatten().as_deref(), Some("v"));
    }
}
