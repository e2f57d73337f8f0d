//! Store and publisher error types
//!
//! This module provides error types for database and broker operations,
//! including connection errors, query errors and schema constraint violations.

use thiserror::Error;

/// Result type alias for store operations
pub type DbResult<T> = Result<T, DbError>;

/// Store-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Database or broker connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// SQL query error
    #[error("Query error: {0}")]
    Query(String),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Row not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Constraint violation (NOT NULL, CHECK, data too long)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Message broker error
    #[error("Broker error: {0}")]
    Broker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal database error
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Check if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }
}

/// Convert SQLx errors to our error type
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound("No rows returned".to_string()),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();

                match db_err.kind() {
                    sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
                    | sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation => {
                        DbError::ConstraintViolation(message)
                    }
                    _ => match db_err.code().as_deref() {
                        // MySQL SQLSTATE 22001: string data right truncation
                        Some("22001") => DbError::ConstraintViolation(message),
                        _ => DbError::Query(message),
                    },
                }
            }

            sqlx::Error::PoolTimedOut => DbError::Pool("Connection pool timeout".to_string()),

            sqlx::Error::PoolClosed => DbError::Pool("Connection pool closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::Connection(format!("I/O error: {}", io_err)),

            sqlx::Error::Tls(tls_err) => DbError::Connection(format!("TLS error: {}", tls_err)),

            sqlx::Error::Protocol(msg) => DbError::Connection(format!("Protocol error: {}", msg)),

            sqlx::Error::ColumnNotFound(col) => {
                DbError::InvalidData(format!("Column not found: {}", col))
            }

            sqlx::Error::ColumnDecode { index, source } => {
                DbError::InvalidData(format!("Failed to decode column {}: {}", index, source))
            }

            sqlx::Error::Decode(msg) => DbError::Serialization(format!("Decode error: {}", msg)),

            sqlx::Error::Migrate(migrate_err) => DbError::Migration(format!("{}", migrate_err)),

            _ => DbError::Internal(format!("{}", err)),
        }
    }
}

/// Convert SQLx migration errors
impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(format!("{}", err))
    }
}

/// Convert serde_json errors
impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(format!("{}", err))
    }
}
