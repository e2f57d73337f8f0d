//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate identifier assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KrathongId(i64);

impl KrathongId {
    /// Wrap a raw store identifier
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw identifier
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for KrathongId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for KrathongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
