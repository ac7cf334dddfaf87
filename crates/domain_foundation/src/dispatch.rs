//! Exception-translation dispatcher
//!
//! Every unit of work a foundation service performs runs inside a
//! [`Dispatcher`]. On failure the dispatcher:
//!
//! 1. classifies the raw [`Fault`] through the [`ClassificationTable`]
//!    (first matching row wins, unmatched faults fall back to `Service`),
//! 2. restates it as an [`EntityFailure`] and wraps that in the
//!    classified [`FoundationError`],
//! 3. logs the result exactly once at the row's [`Severity`],
//! 4. hands it back to the caller.
//!
//! Successful work produces no log entry. Nothing is retried here.
//!
//! # Default table
//!
//! | Fault kind | Outcome | Severity |
//! |---|---|---|
//! | null entity | Validation | error |
//! | invalid entity | Validation | error |
//! | not found | Validation | error |
//! | storage connection | CriticalDependency | critical |
//! | duplicate key | DependencyValidation | error |
//! | foreign key violation | DependencyValidation | error |
//! | write conflict | Dependency | error |
//! | concurrency conflict | DependencyValidation | error |
//! | anything else | Service | error |

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use core_kernel::LoggingPort;

use crate::error::{EntityFailure, Fault, FaultKind, FoundationError};

/// Classified outcome kinds surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Validation,
    DependencyValidation,
    Dependency,
    CriticalDependency,
    Service,
}

/// Severity a classified failure is logged at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Critical,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: FaultKind,
    pub outcome: Outcome,
    pub severity: Severity,
}

impl Classification {
    pub const fn new(kind: FaultKind, outcome: Outcome, severity: Severity) -> Self {
        Self {
            kind,
            outcome,
            severity,
        }
    }
}

/// Ordered mapping from fault kinds to outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    rows: Vec<Classification>,
    fallback: (Outcome, Severity),
}

impl ClassificationTable {
    /// Creates a table from rows evaluated in order, plus a fallback
    pub fn new(rows: Vec<Classification>, fallback: (Outcome, Severity)) -> Self {
        Self { rows, fallback }
    }

    /// Returns the outcome and severity for a fault kind
    pub fn classify(&self, kind: FaultKind) -> (Outcome, Severity) {
        self.rows
            .iter()
            .find(|row| row.kind == kind)
            .map(|row| (row.outcome, row.severity))
            .unwrap_or(self.fallback)
    }

    pub fn rows(&self) -> &[Classification] {
        &self.rows
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        use FaultKind::*;
        use Outcome::*;

        Self::new(
            vec![
                Classification::new(NullEntity, Validation, Severity::Error),
                Classification::new(InvalidEntity, Validation, Severity::Error),
                Classification::new(NotFound, Validation, Severity::Error),
                Classification::new(StorageConnection, CriticalDependency, Severity::Critical),
                Classification::new(DuplicateKey, DependencyValidation, Severity::Error),
                Classification::new(ForeignKeyViolation, DependencyValidation, Severity::Error),
                Classification::new(WriteConflict, Dependency, Severity::Error),
                Classification::new(ConcurrencyConflict, DependencyValidation, Severity::Error),
            ],
            (Service, Severity::Error),
        )
    }
}

/// Wraps units of work and translates their faults
#[derive(Clone)]
pub struct Dispatcher {
    entity: &'static str,
    table: Arc<ClassificationTable>,
    logger: Arc<dyn LoggingPort>,
}

impl Dispatcher {
    pub fn new(entity: &'static str, table: ClassificationTable, logger: Arc<dyn LoggingPort>) -> Self {
        Self {
            entity,
            table: Arc::new(table),
            logger,
        }
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Runs an asynchronous unit of work
    pub async fn run<T, F>(&self, work: F) -> Result<T, FoundationError>
    where
        F: Future<Output = Result<T, Fault>>,
    {
        work.await.map_err(|fault| self.translate(fault))
    }

    /// Runs a synchronous unit of work
    pub fn run_query<T, F>(&self, work: F) -> Result<T, FoundationError>
    where
        F: FnOnce() -> Result<T, Fault>,
    {
        work().map_err(|fault| self.translate(fault))
    }

    /// Classifies, wraps and logs a fault
    pub fn translate(&self, fault: Fault) -> FoundationError {
        let (outcome, severity) = self.table.classify(fault.kind());
        let failure = EntityFailure::from_fault(self.entity, fault);
        let error = FoundationError::new(outcome, self.entity, failure);

        match severity {
            Severity::Critical => self.logger.log_critical(&error),
            Severity::Error => self.logger.log_error(&error),
        }

        error
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("entity", &self.entity)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{LogLevel, RecordingLogger};
    use core_kernel::StorageError;

    fn dispatcher(logger: Arc<RecordingLogger>) -> Dispatcher {
        Dispatcher::new("School", ClassificationTable::default(), logger)
    }

    #[test]
    fn test_default_table_matches_storage_kinds() {
        let table = ClassificationTable::default();

        assert_eq!(
            table.classify(FaultKind::StorageConnection),
            (Outcome::CriticalDependency, Severity::Critical)
        );
        assert_eq!(
            table.classify(FaultKind::WriteConflict),
            (Outcome::Dependency, Severity::Error)
        );
        assert_eq!(
            table.classify(FaultKind::ConcurrencyConflict),
            (Outcome::DependencyValidation, Severity::Error)
        );
        assert_eq!(
            table.classify(FaultKind::Unclassified),
            (Outcome::Service, Severity::Error)
        );
    }

    #[test]
    fn test_first_matching_row_wins() {
        let table = ClassificationTable::new(
            vec![
                Classification::new(FaultKind::NotFound, Outcome::Dependency, Severity::Error),
                Classification::new(FaultKind::NotFound, Outcome::Validation, Severity::Critical),
            ],
            (Outcome::Service, Severity::Error),
        );

        assert_eq!(
            table.classify(FaultKind::NotFound),
            (Outcome::Dependency, Severity::Error)
        );
        assert_eq!(
            table.classify(FaultKind::DuplicateKey),
            (Outcome::Service, Severity::Error)
        );
    }

    #[tokio::test]
    async fn test_success_logs_nothing() {
        let logger = Arc::new(RecordingLogger::new());
        let result = dispatcher(logger.clone()).run(async { Ok::<_, Fault>(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert!(logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_is_logged_critical_once() {
        let logger = Arc::new(RecordingLogger::new());
        let result = dispatcher(logger.clone())
            .run(async { Err::<(), _>(Fault::from(StorageError::connection("offline"))) })
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.outcome(), Outcome::CriticalDependency);

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Critical);
        assert_eq!(entries[0].message, error.to_string());
    }

    #[test]
    fn test_query_failure_is_logged_error_once() {
        let logger = Arc::new(RecordingLogger::new());
        let result = dispatcher(logger.clone())
            .run_query(|| Err::<(), _>(Fault::unexpected(std::io::Error::other("boom"))));

        assert_eq!(result.unwrap_err().outcome(), Outcome::Service);
        assert_eq!(logger.count(LogLevel::Error), 1);
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn test_outcome_and_severity_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&Outcome::CriticalDependency).unwrap(),
            "\"critical_dependency\""
        );
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");

        let outcome: Outcome = serde_json::from_str("\"dependency_validation\"").unwrap();
        assert_eq!(outcome, Outcome::DependencyValidation);
    }
}
