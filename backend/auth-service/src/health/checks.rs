//! Probes for the gateway's collaborators

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::error::{HealthCheckError, Result};
use crate::services::{EventPublisher, IdentityProvider};

/// A single dependency probe
///
/// Returns `Ok(())` if the dependency is healthy, or an error describing the problem.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<()>;
}

/// Identity provider reachability
pub struct IdentityProviderHealthCheck {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityProviderHealthCheck {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl HealthCheck for IdentityProviderHealthCheck {
    async fn check(&self) -> Result<()> {
        self.provider
            .probe()
            .await
            .map_err(|e| HealthCheckError::integration(e.to_string()))
    }
}

/// PostgreSQL health check
///
/// Verifies database connectivity by executing a simple query.
pub struct PostgresHealthCheck {
    pool: PgPool,
}

impl PostgresHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PostgresHealthCheck {
    async fn check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                HealthCheckError::database(format!("Failed to execute health check query: {}", e))
            })?;

        Ok(())
    }
}

/// Broker connection state
pub struct BrokerHealthCheck {
    publisher: Arc<dyn EventPublisher>,
}

impl BrokerHealthCheck {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl HealthCheck for BrokerHealthCheck {
    async fn check(&self) -> Result<()> {
        if self.publisher.is_connected().await {
            Ok(())
        } else {
            Err(HealthCheckError::message_queue("Broker connection is down"))
        }
    }
}
