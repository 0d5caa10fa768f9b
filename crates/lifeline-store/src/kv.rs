//! The key-value persistence seam.
//!
//! [`KvStore`] is the whole contract the log store needs from a backend:
//! blob get/set plus a string set for cross-user indexes. There are no
//! transactions; read-modify-write atomicity is provided one level up by
//! the per-key locks in [`EventLogStore`](crate::EventLogStore).

use std::future::Future;

use crate::dragonfly::DragonflyKv;
use crate::error::StoreError;
use crate::memory::MemoryKv;

/// A string-keyed blob store.
pub trait KvStore: Send + Sync {
    /// Read the blob at `key`. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Overwrite the blob at `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Add `member` to the set at `key`.
    fn add_member(
        &self,
        key: &str,
        member: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All members of the set at `key`, sorted. A missing key is empty.
    fn members(&self, key: &str) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;
}

/// A backend chosen at runtime from configuration.
#[derive(Clone)]
pub enum AnyKv {
    /// In-process map.
    Memory(MemoryKv),
    /// `Dragonfly` / Redis.
    Dragonfly(DragonflyKv),
}

impl AnyKv {
    /// Short backend name for logs.
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Dragonfly(_) => "dragonfly",
        }
    }
}

impl From<MemoryKv> for AnyKv {
    fn from(kv: MemoryKv) -> Self {
        Self::Memory(kv)
    }
}

impl From<DragonflyKv> for AnyKv {
    fn from(kv: DragonflyKv) -> Self {
        Self::Dragonfly(kv)
    }
}

impl KvStore for AnyKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(kv) => kv.get(key).await,
            Self::Dragonfly(kv) => kv.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Self::Memory(kv) => kv.set(key, value).await,
            Self::Dragonfly(kv) => kv.set(key, value).await,
        }
    }

    async fn add_member(&self, key: &str, member: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(kv) => kv.add_member(key, member).await,
            Self::Dragonfly(kv) => kv.add_member(key, member).await,
        }
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        match self {
            Self::Memory(kv) => kv.members(key).await,
            Self::Dragonfly(kv) => kv.members(key).await,
        }
    }
}
