//! Storage Adapters
//!
//! This module provides the PostgreSQL implementations of
//! `domain_foundation::StoragePort`, connecting the foundation services
//! to the repository layer.
//!
//! # Architecture
//!
//! Each entity has a corresponding adapter that:
//! - Implements `StoragePort<E>` for its entity
//! - Translates between domain entities and database row types
//! - Reports database failures as `StorageError`, leaving classification
//!   to the service
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresSchoolAdapter;
//! use domain_school::school_service;
//!
//! let storage = Arc::new(PostgresSchoolAdapter::new(pool));
//! let service = school_service(storage, clock, logger);
//! ```

pub mod school;
pub mod student;

pub use school::PostgresSchoolAdapter;
pub use student::PostgresStudentAdapter;

use chrono::Utc;
use sqlx::PgPool;

use core_kernel::{AdapterHealth, HealthCheckResult};

/// Checks database connectivity
///
/// Performs a simple SELECT 1 query to verify the connection pool
/// is operational and the database is responsive.
pub(crate) async fn check_pool(adapter_id: &str, pool: &PgPool) -> HealthCheckResult {
    let start = std::time::Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(_) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Database error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
