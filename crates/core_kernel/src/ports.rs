//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types shared by the storage ports
//! defined in `domain_foundation` and the adapters that implement them.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Foundation Services                        │
//! │           (SchoolService, StudentService, ...)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StoragePort<E>                            │
//! │      insert / select_all / select_by_id / update / delete    │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  Postgres Adapter │     │ In-memory Mock  │
//!         │     (infra_db)    │     │  (feature mock) │
//!         └───────────────────┘     └─────────────────┘
//! ```
//!
//! Adapters report failures as [`StorageError`]. The foundation layer
//! classifies those failures; adapters never decide severity.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Boxed error used where the concrete cause is opaque
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised by a storage adapter
///
/// The variants are the raw storage failure kinds the foundation layer
/// knows how to classify. Anything else is reported as `Other`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be reached (network, pool, IO)
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A uniqueness constraint rejected the write
    #[error("Duplicate key: {message}")]
    DuplicateKey {
        message: String,
    },

    /// A foreign key constraint rejected the write
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        message: String,
    },

    /// The write was rejected by the store for another reason
    #[error("Write conflict: {message}")]
    WriteConflict {
        message: String,
    },

    /// The record changed or vanished between read and write
    #[error("Concurrency conflict: {message}")]
    ConcurrencyConflict {
        message: String,
    },

    /// An unclassified storage failure
    #[error("Storage error: {message}")]
    Other {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl StorageError {
    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StorageError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Connection error carrying its cause
    pub fn connection_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::Connection {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a DuplicateKey error
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        StorageError::DuplicateKey { message: message.into() }
    }

    /// Creates a ForeignKeyViolation error
    pub fn foreign_key(message: impl Into<String>) -> Self {
        StorageError::ForeignKeyViolation { message: message.into() }
    }

    /// Creates a WriteConflict error
    pub fn write_conflict(message: impl Into<String>) -> Self {
        StorageError::WriteConflict { message: message.into() }
    }

    /// Creates a ConcurrencyConflict error
    pub fn concurrency_conflict(message: impl Into<String>) -> Self {
        StorageError::ConcurrencyConflict { message: message.into() }
    }

    /// Creates an unclassified error
    pub fn other(message: impl Into<String>) -> Self {
        StorageError::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a connectivity failure
    pub fn is_connection(&self) -> bool {
        matches!(self, StorageError::Connection { .. })
    }

    /// Returns true if the store rejected the data itself
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StorageError::DuplicateKey { .. }
                | StorageError::ForeignKeyViolation { .. }
                | StorageError::ConcurrencyConflict { .. }
        )
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable
/// behind `Arc<dyn ...>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_storage_error_connection() {
        let error = StorageError::connection("database offline");
        assert!(error.is_connection());
        assert!(!error.is_constraint_violation());
        assert!(error.to_string().contains("database offline"));
    }

    #[test]
    fn test_storage_error_constraints() {
        assert!(StorageError::duplicate_key("schools_pkey").is_constraint_violation());
        assert!(StorageError::foreign_key("students_school_id_fkey").is_constraint_violation());
        assert!(StorageError::concurrency_conflict("row changed").is_constraint_violation());
        assert!(!StorageError::write_conflict("check failed").is_constraint_violation());
    }

    #[test]
    fn test_connection_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = StorageError::connection_with("pool unavailable", io);
        assert!(error.source().is_some());
    }
}
