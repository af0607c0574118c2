//! Error types for health probes

use thiserror::Error;

/// Result type for health probes
pub type Result<T> = std::result::Result<T, HealthCheckError>;

/// Why a probe reported its dependency as unhealthy
#[derive(Debug, Error)]
pub enum HealthCheckError {
    /// Identity provider unreachable or answering with an error
    #[error("Integration health check failed: {0}")]
    Integration(String),

    /// Database connection or query failure
    #[error("Database health check failed: {0}")]
    Database(String),

    /// Broker connection down
    #[error("Message queue health check failed: {0}")]
    MessageQueue(String),

    #[error("Health check timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Health check aborted: {0}")]
    Aborted(String),
}

impl HealthCheckError {
    pub fn integration(msg: impl Into<String>) -> Self {
        Self::Integration(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn message_queue(msg: impl Into<String>) -> Self {
        Self::MessageQueue(msg.into())
    }
}
