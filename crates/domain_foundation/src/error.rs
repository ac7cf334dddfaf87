//! Foundation error types
//!
//! Failures travel through three layers:
//!
//! 1. [`Fault`]: the raw failure produced inside a unit of work, either by
//!    validation or by the storage port.
//! 2. [`EntityFailure`]: the fault restated in the entity's terms
//!    ("School is null.", "School with the same Id already exists.").
//! 3. [`FoundationError`]: the classified outcome returned to callers. It
//!    wraps the entity failure, which in turn wraps any storage error, so
//!    the whole chain is reachable through `Error::source`.

use thiserror::Error;

use core_kernel::{BoxError, StorageError};

use crate::dispatch::Outcome;
use crate::validation::ValidationErrors;

/// Raw failure raised inside a unit of work
#[derive(Debug, Error)]
pub enum Fault {
    /// No entity was supplied where one is required
    #[error("entity is null")]
    NullEntity,

    /// One or more field rules were violated
    #[error("invalid entity: {0}")]
    InvalidEntity(ValidationErrors),

    /// A lookup by id found nothing
    #[error("entity not found: {id}")]
    NotFound { id: String },

    /// The storage port failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Any other failure
    #[error("unexpected failure: {0}")]
    Unexpected(BoxError),
}

impl Fault {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Fault::NotFound { id: id.to_string() }
    }

    pub fn unexpected(error: impl Into<BoxError>) -> Self {
        Fault::Unexpected(error.into())
    }

    /// Returns the tag used to classify this fault
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::NullEntity => FaultKind::NullEntity,
            Fault::InvalidEntity(_) => FaultKind::InvalidEntity,
            Fault::NotFound { .. } => FaultKind::NotFound,
            Fault::Storage(StorageError::Connection { .. }) => FaultKind::StorageConnection,
            Fault::Storage(StorageError::DuplicateKey { .. }) => FaultKind::DuplicateKey,
            Fault::Storage(StorageError::ForeignKeyViolation { .. }) => FaultKind::ForeignKeyViolation,
            Fault::Storage(StorageError::WriteConflict { .. }) => FaultKind::WriteConflict,
            Fault::Storage(StorageError::ConcurrencyConflict { .. }) => FaultKind::ConcurrencyConflict,
            Fault::Storage(StorageError::Other { .. }) | Fault::Unexpected(_) => FaultKind::Unclassified,
        }
    }
}

impl From<ValidationErrors> for Fault {
    fn from(errors: ValidationErrors) -> Self {
        Fault::InvalidEntity(errors)
    }
}

/// Tag of a [`Fault`], matched against the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NullEntity,
    InvalidEntity,
    NotFound,
    StorageConnection,
    DuplicateKey,
    ForeignKeyViolation,
    WriteConflict,
    ConcurrencyConflict,
    Unclassified,
}

/// A fault restated in terms of the entity it concerns
#[derive(Debug, Error)]
pub enum EntityFailure {
    #[error("{entity} is null.")]
    Null { entity: &'static str },

    #[error("Invalid {entity}. Please correct the errors and try again.")]
    Invalid {
        entity: &'static str,
        errors: ValidationErrors,
    },

    #[error("Couldn't find {entity} with id: {id}.")]
    NotFound { entity: &'static str, id: String },

    #[error("Failed {entity} storage error occurred, contact support.")]
    FailedStorage {
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{entity} with the same Id already exists.")]
    AlreadyExists {
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Invalid {entity} reference error occurred.")]
    InvalidReference {
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Failed {entity} storage update occurred, please contact support.")]
    FailedWrite {
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Locked {entity} record, please try again later.")]
    Locked {
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Failed {entity} service occurred, please contact support.")]
    FailedService {
        entity: &'static str,
        #[source]
        source: BoxError,
    },
}

impl EntityFailure {
    /// Restates a fault for the named entity
    pub fn from_fault(entity: &'static str, fault: Fault) -> Self {
        match fault {
            Fault::NullEntity => EntityFailure::Null { entity },
            Fault::InvalidEntity(errors) => EntityFailure::Invalid { entity, errors },
            Fault::NotFound { id } => EntityFailure::NotFound { entity, id },
            Fault::Storage(source) => match source {
                StorageError::Connection { .. } => EntityFailure::FailedStorage { entity, source },
                StorageError::DuplicateKey { .. } => EntityFailure::AlreadyExists { entity, source },
                StorageError::ForeignKeyViolation { .. } => {
                    EntityFailure::InvalidReference { entity, source }
                }
                StorageError::WriteConflict { .. } => EntityFailure::FailedWrite { entity, source },
                StorageError::ConcurrencyConflict { .. } => EntityFailure::Locked { entity, source },
                StorageError::Other { .. } => EntityFailure::FailedService {
                    entity,
                    source: Box::new(source),
                },
            },
            Fault::Unexpected(source) => EntityFailure::FailedService { entity, source },
        }
    }

    /// Field violations, if this is an invalid-entity failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            EntityFailure::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// The storage error underneath, if any
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            EntityFailure::FailedStorage { source, .. }
            | EntityFailure::AlreadyExists { source, .. }
            | EntityFailure::InvalidReference { source, .. }
            | EntityFailure::FailedWrite { source, .. }
            | EntityFailure::Locked { source, .. } => Some(source),
            EntityFailure::FailedService { source, .. } => source.downcast_ref::<StorageError>(),
            _ => None,
        }
    }
}

/// Classified failure returned by a foundation service
#[derive(Debug, Error)]
pub enum FoundationError {
    /// Bad input: null entity, field violations or unknown id
    #[error("{entity} validation errors occurred, please try again.")]
    Validation {
        entity: &'static str,
        #[source]
        source: EntityFailure,
    },

    /// Storage rejected the request for a reason the caller must fix
    #[error("{entity} dependency validation occurred, please try again.")]
    DependencyValidation {
        entity: &'static str,
        #[source]
        source: EntityFailure,
    },

    /// Storage malfunction short of connectivity loss
    #[error("{entity} dependency error occurred, contact support.")]
    Dependency {
        entity: &'static str,
        #[source]
        source: EntityFailure,
    },

    /// Storage connectivity failure
    #[error("{entity} dependency error occurred, contact support.")]
    CriticalDependency {
        entity: &'static str,
        #[source]
        source: EntityFailure,
    },

    /// Unclassified failure
    #[error("{entity} service error occurred, contact support.")]
    Service {
        entity: &'static str,
        #[source]
        source: EntityFailure,
    },
}

impl FoundationError {
    pub fn new(outcome: Outcome, entity: &'static str, source: EntityFailure) -> Self {
        match outcome {
            Outcome::Validation => FoundationError::Validation { entity, source },
            Outcome::DependencyValidation => FoundationError::DependencyValidation { entity, source },
            Outcome::Dependency => FoundationError::Dependency { entity, source },
            Outcome::CriticalDependency => FoundationError::CriticalDependency { entity, source },
            Outcome::Service => FoundationError::Service { entity, source },
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            FoundationError::Validation { .. } => Outcome::Validation,
            FoundationError::DependencyValidation { .. } => Outcome::DependencyValidation,
            FoundationError::Dependency { .. } => Outcome::Dependency,
            FoundationError::CriticalDependency { .. } => Outcome::CriticalDependency,
            FoundationError::Service { .. } => Outcome::Service,
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            FoundationError::Validation { entity, .. }
            | FoundationError::DependencyValidation { entity, .. }
            | FoundationError::Dependency { entity, .. }
            | FoundationError::CriticalDependency { entity, .. }
            | FoundationError::Service { entity, .. } => entity,
        }
    }

    /// The wrapped entity failure
    pub fn failure(&self) -> &EntityFailure {
        match self {
            FoundationError::Validation { source, .. }
            | FoundationError::DependencyValidation { source, .. }
            | FoundationError::Dependency { source, .. }
            | FoundationError::CriticalDependency { source, .. }
            | FoundationError::Service { source, .. } => source,
        }
    }

    pub fn into_failure(self) -> EntityFailure {
        match self {
            FoundationError::Validation { source, .. }
            | FoundationError::DependencyValidation { source, .. }
            | FoundationError::Dependency { source, .. }
            | FoundationError::CriticalDependency { source, .. }
            | FoundationError::Service { source, .. } => source,
        }
    }

    /// Field violations, for validation failures caused by rule breaches
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        self.failure().validation_errors()
    }
}
