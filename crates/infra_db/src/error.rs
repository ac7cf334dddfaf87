//! Database error types
//!
//! This module defines the errors raised by the repositories and the
//! translation of those errors into the storage failures the foundation
//! services classify.

use thiserror::Error;

use core_kernel::StorageError;

/// Errors that can occur during database operations
///
/// Variants are derived from the SQLx error and, for database errors, the
/// PostgreSQL SQLSTATE code.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish or keep a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A write matched no row
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Serialization failure or deadlock between concurrent transactions
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The database rejected the statement for any other reason
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Failure on the client side (decoding, protocol, configuration)
    #[error("SQL error: {0}")]
    SqlError(String),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity (e.g., "School", "Student")
    /// * `id` - The identifier that was not found
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("School", "SCH-123");
    /// assert!(error.to_string().contains("School"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Maps a PostgreSQL SQLSTATE code to an error variant
    ///
    /// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>
    pub fn from_sqlstate(code: Option<&str>, message: &str) -> Self {
        let message = message.to_string();
        match code {
            Some("23505") => DatabaseError::DuplicateEntry(message),
            Some("23503") => DatabaseError::ForeignKeyViolation(message),
            Some("23514") => DatabaseError::ConstraintViolation(message),
            Some("40001") | Some("40P01") => DatabaseError::TransactionFailed(message),
            // Class 08, server shutdown and connection limit
            Some(code) if code.starts_with("08") => DatabaseError::ConnectionFailed(message),
            Some("57P01") | Some("57P02") | Some("57P03") | Some("53300") => {
                DatabaseError::ConnectionFailed(message)
            }
            _ => DatabaseError::QueryFailed(message),
        }
    }

    /// Checks if this error indicates a write matched no row
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => DatabaseError::ConnectionFailed(error.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code();
                DatabaseError::from_sqlstate(code.as_deref(), db_err.message())
            }
            _ => DatabaseError::SqlError(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Reports a database failure as one of the storage failure kinds
impl From<DatabaseError> for StorageError {
    fn from(error: DatabaseError) -> Self {
        let message = error.to_string();
        match error {
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
                StorageError::connection_with(message, error)
            }
            DatabaseError::DuplicateEntry(_) => StorageError::duplicate_key(message),
            DatabaseError::ForeignKeyViolation(_) => StorageError::foreign_key(message),
            DatabaseError::TransactionFailed(_) | DatabaseError::NotFound(_) => {
                StorageError::concurrency_conflict(message)
            }
            DatabaseError::ConstraintViolation(_) | DatabaseError::QueryFailed(_) => {
                StorageError::write_conflict(message)
            }
            DatabaseError::MigrationFailed(_) | DatabaseError::SqlError(_) => StorageError::Other {
                message,
                source: Some(Box::new(error)),
            },
        }
    }
}
