//! Foundation Services
//!
//! This crate holds everything a per-entity foundation service needs,
//! written once and instantiated per entity type:
//!
//! - **Entity contract**: [`AuditedEntity`] ties an entity to its identifier
//!   and audit metadata.
//! - **Validation rule engine**: ordered batteries of [`FieldRule`]s that
//!   accumulate every violation into [`ValidationErrors`].
//! - **Exception translation**: raw [`Fault`]s are classified through a
//!   [`ClassificationTable`], wrapped into a [`FoundationError`] and logged
//!   exactly once by the [`Dispatcher`].
//! - **Orchestration**: [`FoundationService`] runs add, retrieve-all,
//!   retrieve-by-id, modify and remove-by-id against a [`StoragePort`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use core_kernel::{SystemClock, TracingLoggingBroker};
//! use domain_foundation::FoundationService;
//!
//! let service = FoundationService::new(storage, Arc::new(SystemClock), Arc::new(TracingLoggingBroker))
//!     .with_rules(school_rules());
//!
//! let school = service.add(Some(school)).await?;
//! ```

pub mod entity;
pub mod validation;
pub mod error;
pub mod dispatch;
pub mod records;
pub mod ports;
pub mod config;
pub mod service;

pub use entity::{AuditedEntity, EntityId};
pub use validation::{
    FieldRule, RuleBook, RuleContext, RuleSet, ValidationErrors, ValidationOutcome, fields,
};
pub use error::{EntityFailure, Fault, FaultKind, FoundationError};
pub use dispatch::{Classification, ClassificationTable, Dispatcher, Outcome, Severity};
pub use records::{RecordStream, Records};
pub use ports::StoragePort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{
    FixedClock, InMemoryStorage, LogEntry, LogLevel, RecordingLogger, StorageOperation,
};
pub use config::FoundationConfig;
pub use service::FoundationService;
