//! Repository trait abstraction for Krathong persistence
//!
//! The store is append/read-only: submissions are inserted once and listed
//! newest first. There are no update or delete operations.

use async_trait::async_trait;
use krathong_core::{Krathong, NewKrathong};

use crate::error::DbResult;

/// Repository trait for Krathong persistence operations
///
/// Implementations must be thread-safe (Send + Sync) for use in async contexts.
#[async_trait]
pub trait KrathongRepository: Send + Sync {
    /// Insert a new submission
    ///
    /// # Returns
    /// * `Ok(Krathong)` - The persisted row, including the store-assigned
    ///   `krathong_id` and `created_at`
    /// * `Err(DbError::ConstraintViolation)` - If a required column is missing
    ///   or a text column is too long
    /// * `Err(DbError)` - For other database errors
    async fn insert(&self, krathong: NewKrathong) -> DbResult<Krathong>;

    /// List the most recent submissions
    ///
    /// Rows are ordered by `created_at` descending (ties broken by id
    /// descending) and truncated to `limit`.
    async fn latest(&self, limit: u32) -> DbResult<Vec<Krathong>>;

    /// Health check - verify the store is reachable
    async fn health_check(&self) -> DbResult<()>;
}
