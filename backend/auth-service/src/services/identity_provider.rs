/// Capability interface of the hosted identity provider
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{ExternalIdentity, RawSession, UserMetadata};

/// Remote account lifecycle and session issuance.
///
/// Implementations own their transport (HTTP client, connection pool) and
/// any timeout policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account for the e-mail/password pair
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExternalIdentity, ProviderError>;

    /// Attach metadata to an existing account
    async fn link_metadata(&self, id: &str, metadata: UserMetadata) -> Result<(), ProviderError>;

    /// Exchange credentials for a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<RawSession, ProviderError>;

    /// Revoke the session behind the access token
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Cheap reachability check used by the status endpoint
    async fn probe(&self) -> Result<(), ProviderError>;
}
