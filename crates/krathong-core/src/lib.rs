//! Core domain models for the Krathong service
//!
//! This crate contains the data structures shared by the store, service and
//! API layers: the persisted [`Krathong`] submission, the [`NewKrathong`]
//! insert payload and the store-assigned [`KrathongId`].

pub mod krathong;
pub mod types;

// Re-exports for convenience
pub use krathong::{Krathong, NewKrathong};
pub use types::KrathongId;
