//! Service layer for the Krathong service
//!
//! This crate sits between the API and store layers. It persists submissions
//! through a [`krathong_db::KrathongRepository`], applies the
//! [`PublishMode`] policy when announcing new submissions, and maps store
//! errors to [`ServiceError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use krathong_service::{DefaultKrathongService, KrathongService, PublishMode};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     repository: Arc<dyn krathong_db::KrathongRepository>,
//! #     publisher: Arc<dyn krathong_db::EventPublisher>,
//! # ) {
//! let service = DefaultKrathongService::new(repository, publisher, PublishMode::BestEffort);
//! let latest = service.list_latest().await;
//! # }
//! ```

pub mod error;
pub mod publish;
pub mod submission;

pub use error::{ServiceError, ServiceResult};
pub use publish::PublishMode;
pub use submission::{DefaultKrathongService, KrathongService, LATEST_LIMIT};
