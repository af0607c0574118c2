use async_trait::async_trait;

use crate::error::MessagingError;

/// Best-effort fan-out notification
///
/// A successful `publish` means the broker accepted the message into the
/// exchange. Nothing is known about consumers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), MessagingError>;

    /// Whether the broker connection is currently established
    async fn is_connected(&self) -> bool;
}
