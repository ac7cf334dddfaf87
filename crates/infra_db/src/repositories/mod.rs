//! Repository implementations for registry entities
//!
//! Repositories own the SQL for one table each and speak in row types.
//! Translation to domain entities happens in the adapters.
//!
//! Queries are checked at runtime with `sqlx::query_as`, so the crate
//! builds without a live database.

pub mod school;
pub mod student;

pub use school::{SchoolRepository, SchoolRow};
pub use student::{StudentRepository, StudentRow};
