//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL storage for the campus registry,
//! implementing the foundation storage ports with SQLx.
//!
//! # Architecture
//!
//! - `repositories`: SQL per table, in terms of row types
//! - `adapters`: `StoragePort` implementations translating rows to entities
//!   and database failures to `StorageError`
//! - `pool` / `config`: connection pool settings and migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, StorageConfig, PostgresSchoolAdapter};
//!
//! let config = StorageConfig::from_env()?;
//! let pool = create_pool(config.database_config()).await?;
//! run_migrations(&pool).await?;
//! let schools = PostgresSchoolAdapter::new(pool);
//! ```

pub mod pool;
pub mod config;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use config::StorageConfig;
pub use error::DatabaseError;
pub use repositories::{SchoolRepository, SchoolRow, StudentRepository, StudentRow};
pub use adapters::{PostgresSchoolAdapter, PostgresStudentAdapter};
