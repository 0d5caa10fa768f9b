//! User profile blobs under `user:{userId}`.

use lifeline_types::{UserId, UserProfile};

use crate::error::StoreError;
use crate::keys::Namespace;
use crate::kv::KvStore;

/// Operations on stored user profiles.
pub struct ProfileStore<'a, S> {
    kv: &'a S,
}

impl<'a, S: KvStore> ProfileStore<'a, S> {
    /// Create a profile store bound to a backend.
    pub const fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    /// Store (or replace) a profile under its own user id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the write fails.
    pub async fn put(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let key = Namespace::User.user_key(&profile.user_id);
        let blob = serde_json::to_string(profile)?;
        self.kv.set(&key, blob).await?;
        tracing::debug!(user_id = %profile.user_id, "Stored user profile");
        Ok(())
    }

    /// Load a profile. A missing profile is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the read fails, or
    /// [`StoreError::Serialization`] if the blob is corrupt.
    pub async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let key = Namespace::User.user_key(user_id);
        match self.kv.get(&key).await? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }
}
