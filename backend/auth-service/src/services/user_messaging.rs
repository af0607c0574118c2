/// AMQP publisher for user lifecycle broadcasts
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use std::collections::HashSet;
use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::MessagingError;
use crate::services::EventPublisher;

/// AMQP delivery mode for messages that survive a broker restart
const PERSISTENT: u8 = 2;

const BROKER_TIMEOUT: Duration = Duration::from_secs(5);

struct BrokerLink {
    connection: Connection,
    channel: Channel,
    declared: HashSet<String>,
}

impl BrokerLink {
    fn is_usable(&self) -> bool {
        self.connection.status().connected() && self.channel.status().connected()
    }
}

/// Publishes each topic to a durable fanout exchange of the same name.
///
/// The connection is opened on first use and re-opened on the next publish
/// after it drops. Publisher confirms are enabled, so `publish` resolves once
/// the broker has accepted the message into the exchange. Every broker
/// round-trip is bounded by the configured timeout.
///
/// The link lock only covers connecting and exchange declaration; the publish
/// and its confirm run on a cloned channel outside the lock.
pub struct UserMessagingService {
    uri: String,
    timeout: Duration,
    link: Mutex<Option<BrokerLink>>,
    /// Channel of the current link, readable without the link lock
    active: RwLock<Option<Channel>>,
}

impl UserMessagingService {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::with_timeout(uri, BROKER_TIMEOUT)
    }

    pub fn with_timeout(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            uri: uri.into(),
            timeout,
            link: Mutex::new(None),
            active: RwLock::new(None),
        }
    }

    /// Open the connection eagerly. Failures are logged, not fatal.
    pub async fn connect(&self) {
        let mut link = self.link.lock().await;
        if let Err(e) = self.ensure_link(&mut link).await {
            warn!(error = %e, "Message broker unavailable at startup");
        }
    }

    async fn bounded<T, F>(&self, step: F) -> Result<T, MessagingError>
    where
        F: Future<Output = Result<T, lapin::Error>>,
    {
        tokio::time::timeout(self.timeout, step)
            .await
            .map_err(|_| MessagingError::Timeout(self.timeout))?
            .map_err(MessagingError::from)
    }

    async fn ensure_link<'a>(
        &self,
        link: &'a mut Option<BrokerLink>,
    ) -> Result<&'a mut BrokerLink, MessagingError> {
        if !link.as_ref().is_some_and(BrokerLink::is_usable) {
            *link = None;
            self.set_active(None);

            let opened = self.open().await?;
            self.set_active(Some(opened.channel.clone()));
            *link = Some(opened);
        }

        link.as_mut()
            .ok_or_else(|| MessagingError::Rejected("broker link missing".to_string()))
    }

    async fn open(&self) -> Result<BrokerLink, MessagingError> {
        let connection = self
            .bounded(Connection::connect(&self.uri, ConnectionProperties::default()))
            .await?;
        let channel = self.bounded(connection.create_channel()).await?;
        self.bounded(channel.confirm_select(ConfirmSelectOptions::default()))
            .await?;

        info!("Connected to message broker");

        Ok(BrokerLink {
            connection,
            channel,
            declared: HashSet::new(),
        })
    }

    /// Usable channel with `topic` declared on it
    async fn channel_for(&self, topic: &str) -> Result<Channel, MessagingError> {
        let mut guard = self.link.lock().await;
        let link = self.ensure_link(&mut guard).await?;

        if !link.declared.contains(topic) {
            self.bounded(link.channel.exchange_declare(
                topic,
                ExchangeKind::Fanout,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            ))
            .await?;
            link.declared.insert(topic.to_string());
        }

        Ok(link.channel.clone())
    }

    fn set_active(&self, channel: Option<Channel>) {
        if let Ok(mut active) = self.active.write() {
            *active = channel;
        }
    }
}

#[async_trait]
impl EventPublisher for UserMessagingService {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), MessagingError> {
        let body = serde_json::to_vec(&payload)?;
        let channel = self.channel_for(topic).await?;

        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(PERSISTENT);

        let confirm = self
            .bounded(channel.basic_publish(
                topic,
                "",
                BasicPublishOptions::default(),
                &body,
                properties,
            ))
            .await?;
        let confirmation = self.bounded(confirm).await?;

        if confirmation.is_nack() {
            warn!(topic, "Broker nacked message");
            return Err(MessagingError::Rejected(topic.to_string()));
        }

        debug!(topic, bytes = body.len(), "Message published");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.active
            .read()
            .map(|active| active.as_ref().is_some_and(|c| c.status().connected()))
            .unwrap_or(false)
    }
}
