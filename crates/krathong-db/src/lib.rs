//! Store adapter and event publisher for the Krathong service
//!
//! This crate provides persistence and notification plumbing:
//! - Connection pool management with bounded size and connection recycling
//! - The [`KrathongRepository`] trait with MySQL and (feature `sqlite`)
//!   SQLite implementations
//! - Embedded schema migrations
//! - A NATS-backed [`EventPublisher`]
//!
//! # Example
//!
//! ```rust,no_run
//! use krathong_db::{create_pool, ConnectionSettings, MySqlKrathongRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ConnectionSettings::new("user", "password", "loykrathong", "localhost", 3306);
//! let pool = create_pool(&PoolConfig::new(settings)).await?;
//!
//! let repo = MySqlKrathongRepository::new(pool);
//! # Ok(())
//! # }
//! ```

// Re-export core domain types for convenience
pub use krathong_core;

pub mod error;
pub mod mysql;
pub mod nats_publisher;
pub mod pool;
pub mod repository;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use mysql::MySqlKrathongRepository;
pub use nats_publisher::{EventPublisher, NatsEventPublisher, NatsPublisherConfig};
#[cfg(feature = "sqlite")]
pub use pool::create_sqlite_pool;
pub use pool::{
    close_pool, create_pool, run_migrations, verify_pool_health, ConnectionSettings, PoolConfig,
};
pub use repository::KrathongRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKrathongRepository;

pub use sqlx::mysql::MySqlPool;
