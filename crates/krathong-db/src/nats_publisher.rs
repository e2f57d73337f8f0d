//! NATS event publisher
//!
//! Publishes one notification per created submission to a single subject.
//! Publishing is fire-and-forget: `publish` hands the message to the client's
//! outbound buffer and does not wait for the broker. Buffered messages are
//! flushed by [`NatsEventPublisher::close`] during shutdown.

use async_nats::{Client, ConnectOptions, HeaderMap};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};

/// Header carrying the message key
pub const KEY_HEADER: &str = "Krathong-Key";

/// Publisher abstraction over the message broker
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver one key/value message to the configured topic
    async fn publish(&self, key: &[u8], value: &[u8]) -> DbResult<()>;
}

/// NATS event publisher configuration
#[derive(Debug, Clone)]
pub struct NatsPublisherConfig {
    /// NATS server URL
    pub server_url: String,

    /// Subject messages are published to
    pub subject: String,

    /// Client name for identification
    pub client_name: String,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Reconnect delay
    pub reconnect_delay: Duration,
}

impl NatsPublisherConfig {
    /// Create new configuration
    pub fn new(server_url: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            subject: subject.into(),
            client_name: "krathong-service".to_string(),
            connect_timeout: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(1),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> DbResult<()> {
        if self.server_url.is_empty() {
            return Err(DbError::Configuration(
                "Broker address cannot be empty".to_string(),
            ));
        }
        if self.subject.is_empty() {
            return Err(DbError::Configuration(
                "Broker topic cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// NATS event publisher bound to one server and one subject
#[derive(Clone)]
pub struct NatsEventPublisher {
    client: Client,
    config: NatsPublisherConfig,
}

impl NatsEventPublisher {
    /// Create a new NATS event publisher
    ///
    /// The initial connection is retried in the background, so an unreachable
    /// broker does not block startup.
    pub async fn new(config: NatsPublisherConfig) -> DbResult<Self> {
        config.validate()?;

        info!(
            "Initializing NATS publisher with server: {} and subject: {}",
            config.server_url, config.subject
        );

        let reconnect_delay = config.reconnect_delay;
        let connect_options = ConnectOptions::new()
            .name(&config.client_name)
            .connection_timeout(config.connect_timeout)
            .retry_on_initial_connect()
            .reconnect_delay_callback(move |attempts| {
                if attempts > 5 {
                    warn!("NATS reconnection attempt #{}", attempts);
                }
                reconnect_delay
            });

        let client = connect_options
            .connect(config.server_url.as_str())
            .await
            .map_err(|e| DbError::Broker(format!("Failed to connect to NATS: {}", e)))?;

        info!("NATS publisher initialized");

        Ok(Self { client, config })
    }

    /// Flush buffered messages and release the client
    pub async fn close(self) -> DbResult<()> {
        info!("Closing NATS publisher");

        self.client
            .flush()
            .await
            .map_err(|e| DbError::Broker(format!("Failed to flush NATS: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for NatsEventPublisher {
    async fn publish(&self, key: &[u8], value: &[u8]) -> DbResult<()> {
        let key = String::from_utf8_lossy(key);
        debug!(
            "Publishing message to subject: {} (key: {}, {} bytes)",
            self.config.subject,
            key,
            value.len()
        );

        let mut headers = HeaderMap::new();
        headers.insert(KEY_HEADER, &*key);

        self.client
            .publish_with_headers(self.config.subject.clone(), headers, value.to_vec().into())
            .await
            .map_err(|e| {
                error!("Failed to publish message to NATS: {}", e);
                DbError::Broker(format!("NATS publish failed: {}", e))
            })?;

        debug!("Message handed to NATS client");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = NatsPublisherConfig::new("nats://localhost:4222", "krathong.created");

        assert_eq!(config.server_url, "nats://localhost:4222");
        assert_eq!(config.subject, "krathong.created");
        assert_eq!(config.client_name, "krathong-service");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_requires_address_and_topic() {
        assert!(NatsPublisherConfig::new("", "topic").validate().is_err());
        assert!(NatsPublisherConfig::new("nats://localhost:4222", "")
            .validate()
            .is_err());
    }
}
