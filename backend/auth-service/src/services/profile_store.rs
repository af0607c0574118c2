use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::LocalProfile;

/// Durable local profile persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a profile bound to the external identity `auth_id`
    async fn create(&self, auth_id: &str, name: &str) -> Result<LocalProfile, StoreError>;
}
