//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! campus registry test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built instants, names and entities
//! - `builders`: Builder patterns for test data construction
//! - `harness`: Services wired to in-memory doubles
//! - `assertions`: Assertion helpers for classified failures
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod harness;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use harness::*;
pub use assertions::*;
pub use generators::*;
