//! Submission service
//!
//! Orchestrates the create and list operations: insert through the
//! repository, then optionally announce the new record on the broker.

use async_trait::async_trait;
use krathong_core::{Krathong, NewKrathong};
use krathong_db::{EventPublisher, KrathongRepository};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::publish::PublishMode;

/// Number of submissions returned by the list operation
pub const LATEST_LIMIT: u32 = 50;

/// Trait for Krathong submission operations
#[async_trait]
pub trait KrathongService: Send + Sync {
    /// Persist a submission and, depending on the publish mode, announce it
    async fn create_krathong(&self, request: NewKrathong) -> ServiceResult<Krathong>;

    /// The most recent submissions, newest first, at most [`LATEST_LIMIT`]
    async fn list_latest(&self) -> ServiceResult<Vec<Krathong>>;

    /// Check that the store is reachable
    async fn health_check(&self) -> ServiceResult<()>;
}

/// Default implementation of KrathongService
pub struct DefaultKrathongService {
    repository: Arc<dyn KrathongRepository>,
    publisher: Arc<dyn EventPublisher>,
    publish_mode: PublishMode,
}

impl DefaultKrathongService {
    /// Create a new submission service
    pub fn new(
        repository: Arc<dyn KrathongRepository>,
        publisher: Arc<dyn EventPublisher>,
        publish_mode: PublishMode,
    ) -> Self {
        Self {
            repository,
            publisher,
            publish_mode,
        }
    }

    /// Serialize and publish a created record, keyed by its id
    async fn publish_created(&self, krathong: &Krathong) -> ServiceResult<()> {
        let key = krathong.krathong_id.to_string();
        let value = serde_json::to_vec(krathong)?;

        debug!("Attempting to publish krathong {}", key);
        self.publisher.publish(key.as_bytes(), &value).await?;
        Ok(())
    }
}

#[async_trait]
impl KrathongService for DefaultKrathongService {
    #[instrument(skip(self, request), fields(publish_mode = %self.publish_mode))]
    async fn create_krathong(&self, request: NewKrathong) -> ServiceResult<Krathong> {
        let krathong = self.repository.insert(request).await?;
        info!(krathong_id = %krathong.krathong_id, "Krathong created");

        match self.publish_mode {
            PublishMode::Disabled => {}
            PublishMode::BestEffort => {
                if let Err(e) = self.publish_created(&krathong).await {
                    warn!(krathong_id = %krathong.krathong_id, "Failed to publish krathong: {}", e);
                }
            }
            PublishMode::Required => {
                self.publish_created(&krathong).await.map_err(|e| match e {
                    ServiceError::Publish(_) => e,
                    other => ServiceError::Publish(other.to_string()),
                })?;
            }
        }

        Ok(krathong)
    }

    #[instrument(skip(self))]
    async fn list_latest(&self) -> ServiceResult<Vec<Krathong>> {
        let krathongs = self.repository.latest(LATEST_LIMIT).await?;
        debug!("Retrieved {} krathongs", krathongs.len());
        Ok(krathongs)
    }

    async fn health_check(&self) -> ServiceResult<()> {
        self.repository.health_check().await?;
        Ok(())
    }
}
