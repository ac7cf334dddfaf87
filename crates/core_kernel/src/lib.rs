//! Core Kernel - Foundational types shared by every registry crate
//!
//! This crate provides the building blocks that the foundation services and
//! the storage adapters agree on:
//! - Strongly-typed identifiers with an empty sentinel
//! - Audit metadata carried by every persisted entity
//! - The clock and logging ports consumed by the service layer
//! - Storage-level failures raised by storage adapters

pub mod identifiers;
pub mod audit;
pub mod temporal;
pub mod logging;
pub mod ports;
pub mod error;

pub use identifiers::{SchoolId, StudentId, UserId};
pub use audit::AuditInfo;
pub use temporal::{ClockPort, SystemClock, is_within_tolerance};
pub use logging::{LoggingPort, TracingLoggingBroker};
pub use ports::{
    StorageError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    BoxError,
};
pub use error::CoreError;
