use chrono::Utc;
use std::sync::Arc;

use crate::error::{DependencyError, ProviderError};
use crate::models::{Credentials, Session};
use crate::services::{
    EventPublisher, IdentityProvider, ProfileStore, RegistrationOrchestrator, SessionAssembler,
};

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    registration: RegistrationOrchestrator,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let registration = RegistrationOrchestrator::new(Arc::clone(&identity), profiles, events);
        Self {
            identity,
            registration,
        }
    }

    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> Result<Session, DependencyError> {
        self.registration.sign_up(credentials, name).await
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ProviderError> {
        let raw = self
            .identity
            .sign_in(&credentials.email, &credentials.password)
            .await?;

        tracing::info!(auth_id = %raw.user.id, "User signed in");
        Ok(SessionAssembler::session(raw, Utc::now()))
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.identity.sign_out(access_token).await?;
        tracing::info!("User signed out");
        Ok(())
    }
}
