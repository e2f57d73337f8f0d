//! Service-layer error types
//!
//! This module maps store and publisher errors to service-level errors.

use krathong_db::DbError;
use thiserror::Error;

/// Result type alias for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Service-layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Store operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Notification could not be published
    #[error("Publish error: {0}")]
    Publish(String),

    /// Internal service error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Broker(msg) => ServiceError::Publish(msg),
            DbError::Serialization(msg) => ServiceError::Internal(msg),
            DbError::Configuration(msg) => ServiceError::Internal(msg),
            other => ServiceError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("Serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_from_db_error() {
        let db_err = DbError::ConstraintViolation("Column 'emp_name' cannot be null".to_string());
        let service_err: ServiceError = db_err.into();
        assert!(matches!(service_err, ServiceError::Database(_)));
        assert!(service_err.to_string().contains("emp_name"));
    }

    #[test]
    fn test_service_error_from_broker_error() {
        let service_err: ServiceError = DbError::Broker("no responders".to_string()).into();
        assert!(matches!(service_err, ServiceError::Publish(_)));
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::Publish("timed out".to_string());
        assert_eq!(err.to_string(), "Publish error: timed out");
    }
}
