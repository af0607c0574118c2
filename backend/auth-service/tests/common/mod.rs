//! In-memory collaborators for router tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use auth_service::{
    error::{MessagingError, ProviderError, StoreError},
    health::{
        BrokerHealthCheck, HealthAggregator, HealthCheck, HealthCheckError, HealthSection,
        IdentityProviderHealthCheck,
    },
    models::{ExternalIdentity, LocalProfile, RawSession, RawUser, UserMetadata},
    services::{AuthService, EventPublisher, IdentityProvider, ProfileStore},
    AppState,
};

pub const EXTERNAL_ID: &str = "71b3c064-a7df-4a6c-9588-dc347a284558";

fn raw_user(email: &str) -> RawUser {
    let at = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap().fixed_offset();
    RawUser {
        id: EXTERNAL_ID.to_string(),
        email: email.to_string(),
        role: "authenticated".to_string(),
        last_sign_in_at: Some(at),
        created_at: at,
        updated_at: at,
    }
}

/// Identity provider that accepts everything unless told otherwise
#[derive(Default)]
pub struct FakeIdentityProvider {
    pub reject_create: Option<(u16, &'static str)>,
    pub reject_sign_in: Option<(u16, &'static str)>,
    pub probe_down: bool,
    pub linked: Mutex<Vec<(String, UserMetadata)>>,
    pub signed_out: Mutex<Vec<String>>,
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<ExternalIdentity, ProviderError> {
        if let Some((status, message)) = self.reject_create {
            return Err(ProviderError::new(status, message));
        }
        Ok(auth_service::services::SessionAssembler::identity(raw_user(email)))
    }

    async fn link_metadata(&self, id: &str, metadata: UserMetadata) -> Result<(), ProviderError> {
        self.linked.lock().unwrap().push((id.to_string(), metadata));
        Ok(())
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<RawSession, ProviderError> {
        if let Some((status, message)) = self.reject_sign_in {
            return Err(ProviderError::new(status, message));
        }
        Ok(RawSession {
            access_token: "access-token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: None,
            refresh_token: "refresh-token".to_string(),
            user: raw_user(email),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        if self.probe_down {
            Err(ProviderError::transport("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct FakeProfileStore {
    pub unavailable: bool,
    pub profiles: Mutex<Vec<LocalProfile>>,
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn create(&self, auth_id: &str, name: &str) -> Result<LocalProfile, StoreError> {
        if self.unavailable {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let profile = LocalProfile {
            id: Uuid::new_v4(),
            auth_id: auth_id.to_string(),
            name: name.to_string(),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile)
    }
}

#[derive(Default)]
pub struct FakePublisher {
    pub disconnected: bool,
    pub published: Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl EventPublisher for FakePublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), MessagingError> {
        if self.disconnected {
            return Err(MessagingError::Rejected(topic.to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        !self.disconnected
    }
}

/// Database probe stand-in
pub struct StaticCheck(pub bool);

#[async_trait]
impl HealthCheck for StaticCheck {
    async fn check(&self) -> Result<(), HealthCheckError> {
        if self.0 {
            Ok(())
        } else {
            Err(HealthCheckError::database("pool closed"))
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub identity: Arc<FakeIdentityProvider>,
    pub profiles: Arc<FakeProfileStore>,
    pub publisher: Arc<FakePublisher>,
}

pub fn test_app(
    identity: FakeIdentityProvider,
    profiles: FakeProfileStore,
    publisher: FakePublisher,
    database_up: bool,
) -> TestApp {
    let identity = Arc::new(identity);
    let profiles = Arc::new(profiles);
    let publisher = Arc::new(publisher);

    let health = HealthAggregator::new(Duration::from_secs(1))
        .with_probe(
            HealthSection::Integrations,
            "supabase",
            Arc::new(IdentityProviderHealthCheck::new(identity.clone())),
        )
        .with_probe(
            HealthSection::Databases,
            "nova_auth",
            Arc::new(StaticCheck(database_up)),
        )
        .with_probe(
            HealthSection::Rabbitmq,
            "user",
            Arc::new(BrokerHealthCheck::new(publisher.clone())),
        );

    let state = AppState {
        auth: Arc::new(AuthService::new(
            identity.clone(),
            profiles.clone(),
            publisher.clone(),
        )),
        health: Arc::new(health),
    };

    TestApp {
        state,
        identity,
        profiles,
        publisher,
    }
}

pub fn default_app() -> TestApp {
    test_app(
        FakeIdentityProvider::default(),
        FakeProfileStore::default(),
        FakePublisher::default(),
        true,
    )
}
