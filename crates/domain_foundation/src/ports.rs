//! Storage port
//!
//! The single seam between a foundation service and the backing store.
//! Adapters translate their native failures into [`StorageError`] and do
//! nothing else: no validation, no logging of failures, no retries.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, StorageError};

use crate::entity::AuditedEntity;
use crate::records::Records;

/// Persistence operations for one entity type
///
/// # Errors
///
/// Every operation reports failures as [`StorageError`]. In particular:
///
/// - `insert` of an id that already exists is `DuplicateKey`
/// - `update` or `delete` of a record that no longer exists is
///   `ConcurrencyConflict`
#[async_trait]
pub trait StoragePort<E: AuditedEntity>: DomainPort + HealthCheckable {
    /// Persists a new entity and returns the stored form
    async fn insert(&self, entity: E) -> Result<E, StorageError>;

    /// Describes a query over every stored entity; nothing runs until the
    /// returned records are consumed
    fn select_all(&self) -> Records<E>;

    /// Looks up an entity by id
    async fn select_by_id(&self, id: E::Id) -> Result<Option<E>, StorageError>;

    /// Replaces a stored entity and returns the stored form
    async fn update(&self, entity: E) -> Result<E, StorageError>;

    /// Deletes a stored entity and returns what was deleted
    async fn delete(&self, entity: E) -> Result<E, StorageError>;
}

/// In-memory doubles for the foundation ports
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::error::Error as StdError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};
    use futures::stream::{self, StreamExt};
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, ClockPort, HealthCheckResult, LoggingPort};

    /// Storage operations, for call counting and failure injection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StorageOperation {
        Insert,
        SelectAll,
        SelectById,
        Update,
        Delete,
    }

    /// In-memory implementation of [`StoragePort`]
    ///
    /// Records are kept in insertion order. A failure queued with
    /// [`InMemoryStorage::fail_next`] is returned by the next call to that
    /// operation (for `SelectAll`, by the next execution of the records).
    #[derive(Debug)]
    pub struct InMemoryStorage<E> {
        records: Arc<RwLock<Vec<E>>>,
        failures: Arc<Mutex<HashMap<StorageOperation, StorageError>>>,
        calls: Arc<Mutex<HashMap<StorageOperation, usize>>>,
    }

    impl<E: AuditedEntity> InMemoryStorage<E> {
        pub fn new() -> Self {
            Self {
                records: Arc::new(RwLock::new(Vec::new())),
                failures: Arc::new(Mutex::new(HashMap::new())),
                calls: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        /// Adds records directly, without counting a call
        pub async fn seed(&self, records: impl IntoIterator<Item = E>) {
            self.records.write().await.extend(records);
        }

        /// Makes the next call to `operation` fail with `error`
        pub fn fail_next(&self, operation: StorageOperation, error: StorageError) {
            self.failures
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(operation, error);
        }

        /// Number of times `operation` was called
        pub fn calls(&self, operation: StorageOperation) -> usize {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(&operation)
                .copied()
                .unwrap_or(0)
        }

        /// Number of calls across all operations
        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).values().sum()
        }

        pub async fn get(&self, id: E::Id) -> Option<E> {
            self.records.read().await.iter().find(|e| e.id() == id).cloned()
        }

        pub async fn contains(&self, id: E::Id) -> bool {
            self.get(id).await.is_some()
        }

        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        fn record_call(&self, operation: StorageOperation) -> Result<(), StorageError> {
            *self
                .calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .entry(operation)
                .or_default() += 1;

            match take_failure(&self.failures, operation) {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    fn take_failure(
        failures: &Mutex<HashMap<StorageOperation, StorageError>>,
        operation: StorageOperation,
    ) -> Option<StorageError> {
        failures.lock().unwrap_or_else(|e| e.into_inner()).remove(&operation)
    }

    impl<E: AuditedEntity> Default for InMemoryStorage<E> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E: AuditedEntity> DomainPort for InMemoryStorage<E> {}

    #[async_trait]
    impl<E: AuditedEntity> HealthCheckable for InMemoryStorage<E> {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: format!("in-memory-{}-storage", E::NAME.to_lowercase()),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory storage always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl<E: AuditedEntity> StoragePort<E> for InMemoryStorage<E> {
        async fn insert(&self, entity: E) -> Result<E, StorageError> {
            self.record_call(StorageOperation::Insert)?;
            let mut records = self.records.write().await;
            if records.iter().any(|e| e.id() == entity.id()) {
                return Err(StorageError::duplicate_key(format!(
                    "{} {} already exists",
                    E::NAME,
                    entity.id()
                )));
            }
            records.push(entity.clone());
            Ok(entity)
        }

        fn select_all(&self) -> Records<E> {
            *self
                .calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .entry(StorageOperation::SelectAll)
                .or_default() += 1;

            let records = Arc::clone(&self.records);
            let failures = Arc::clone(&self.failures);

            Records::new(move || {
                let records = Arc::clone(&records);
                let failures = Arc::clone(&failures);
                stream::once(async move {
                    match take_failure(&failures, StorageOperation::SelectAll) {
                        Some(error) => vec![Err(error)],
                        None => records.read().await.iter().cloned().map(Ok).collect(),
                    }
                })
                .flat_map(stream::iter)
                .boxed()
            })
        }

        async fn select_by_id(&self, id: E::Id) -> Result<Option<E>, StorageError> {
            self.record_call(StorageOperation::SelectById)?;
            Ok(self.get(id).await)
        }

        async fn update(&self, entity: E) -> Result<E, StorageError> {
            self.record_call(StorageOperation::Update)?;
            let mut records = self.records.write().await;
            let slot = records
                .iter_mut()
                .find(|e| e.id() == entity.id())
                .ok_or_else(|| {
                    StorageError::concurrency_conflict(format!("{} {} no longer exists", E::NAME, entity.id()))
                })?;
            *slot = entity.clone();
            Ok(entity)
        }

        async fn delete(&self, entity: E) -> Result<E, StorageError> {
            self.record_call(StorageOperation::Delete)?;
            let mut records = self.records.write().await;
            let index = records
                .iter()
                .position(|e| e.id() == entity.id())
                .ok_or_else(|| {
                    StorageError::concurrency_conflict(format!("{} {} no longer exists", E::NAME, entity.id()))
                })?;
            Ok(records.remove(index))
        }
    }

    /// Clock pinned to a settable instant that counts its reads
    #[derive(Debug)]
    pub struct FixedClock {
        now: Mutex<DateTime<Utc>>,
        reads: AtomicUsize,
    }

    impl FixedClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
                reads: AtomicUsize::new(0),
            }
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
        }

        /// Number of times the current instant was read
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ClockPort for FixedClock {
        fn current_date_time(&self) -> DateTime<Utc> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            *self.now.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LogLevel {
        Error,
        Critical,
        Information,
        Trace,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LogEntry {
        pub level: LogLevel,
        pub message: String,
    }

    /// Logger that keeps every entry in memory
    #[derive(Debug, Default)]
    pub struct RecordingLogger {
        entries: Mutex<Vec<LogEntry>>,
    }

    impl RecordingLogger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn entries(&self) -> Vec<LogEntry> {
            self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Messages logged at error severity
        pub fn errors(&self) -> Vec<String> {
            self.messages(LogLevel::Error)
        }

        /// Messages logged at critical severity
        pub fn criticals(&self) -> Vec<String> {
            self.messages(LogLevel::Critical)
        }

        pub fn count(&self, level: LogLevel) -> usize {
            self.messages(level).len()
        }

        fn messages(&self, level: LogLevel) -> Vec<String> {
            self.entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .filter(|entry| entry.level == level)
                .map(|entry| entry.message.clone())
                .collect()
        }

        fn push(&self, level: LogLevel, message: String) {
            self.entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(LogEntry { level, message });
        }
    }

    impl LoggingPort for RecordingLogger {
        fn log_error(&self, error: &(dyn StdError + 'static)) {
            self.push(LogLevel::Error, error.to_string());
        }

        fn log_critical(&self, error: &(dyn StdError + 'static)) {
            self.push(LogLevel::Critical, error.to_string());
        }

        fn log_information(&self, message: &str) {
            self.push(LogLevel::Information, message.to_string());
        }

        fn log_trace(&self, message: &str) {
            self.push(LogLevel::Trace, message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use core_kernel::{AuditInfo, SchoolId, UserId};
    use chrono::Utc;

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        id: SchoolId,
        audit: AuditInfo,
    }

    impl AuditedEntity for Sample {
        type Id = SchoolId;
        const NAME: &'static str = "Sample";

        fn id(&self) -> SchoolId {
            self.id
        }

        fn audit(&self) -> &AuditInfo {
            &self.audit
        }
    }

    fn sample() -> Sample {
        Sample {
            id: SchoolId::new(),
            audit: AuditInfo::created(UserId::new(), Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_rejected() {
        let storage = InMemoryStorage::<Sample>::new();
        let entity = sample();

        storage.insert(entity.clone()).await.unwrap();
        let error = storage.insert(entity).await.unwrap_err();

        assert!(matches!(error, StorageError::DuplicateKey { .. }));
        assert_eq!(storage.calls(StorageOperation::Insert), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_of_missing_record_conflict() {
        let storage = InMemoryStorage::<Sample>::new();

        let update = storage.update(sample()).await.unwrap_err();
        let delete = storage.delete(sample()).await.unwrap_err();

        assert!(matches!(update, StorageError::ConcurrencyConflict { .. }));
        assert!(matches!(delete, StorageError::ConcurrencyConflict { .. }));
    }

    #[tokio::test]
    async fn test_select_all_reflects_state_at_execution() {
        let storage = InMemoryStorage::<Sample>::new();
        let records = storage.select_all();
        assert!(records.collect().await.unwrap().is_empty());

        storage.insert(sample()).await.unwrap();
        assert_eq!(records.collect().await.unwrap().len(), 1);
        assert_eq!(storage.calls(StorageOperation::SelectAll), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let storage = InMemoryStorage::<Sample>::new();
        storage.fail_next(StorageOperation::SelectById, StorageError::connection("offline"));

        assert!(storage.select_by_id(SchoolId::new()).await.is_err());
        assert!(storage.select_by_id(SchoolId::new()).await.unwrap().is_none());
    }

    #[test]
    fn test_fixed_clock_counts_reads() {
        let now = Utc::now();
        let clock = FixedClock::new(now);

        use core_kernel::ClockPort;
        assert_eq!(clock.current_date_time(), now);
        assert_eq!(clock.reads(), 1);
    }
}
