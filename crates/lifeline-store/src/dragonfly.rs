//! `Dragonfly` (Redis-compatible) backend.
//!
//! Blobs are plain string values; report indexes are Redis sets. Any
//! client or protocol failure is reported as
//! [`StoreError::Unavailable`](crate::StoreError::Unavailable).

use fred::prelude::*;

use crate::error::StoreError;
use crate::kv::KvStore;

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`]. Clones share the connection.
#[derive(Clone)]
pub struct DragonflyKv {
    client: Client,
}

impl DragonflyKv {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::Unavailable`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Flush all keys from the `Dragonfly` instance.
    ///
    /// **WARNING:** This deletes all data. Only use for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the flush fails.
    pub async fn flush_all(&self) -> Result<(), StoreError> {
        let _: () = self.client.flushall(false).await?;
        Ok(())
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

impl KvStore for DragonflyKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _: () = self
            .client
            .set(key, value.as_str(), None, None, false)
            .await?;
        Ok(())
    }

    async fn add_member(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let _: u32 = self.client.sadd(key, member).await?;
        Ok(())
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut members: Vec<String> = self.client.smembers(key).await?;
        members.sort();
        Ok(members)
    }
}
