//! Generic foundation service
//!
//! One [`FoundationService`] is instantiated per entity type. It owns no
//! state between calls: every operation validates its input, talks to the
//! storage port and returns, with all failures passing through the
//! [`Dispatcher`] exactly once.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use core_kernel::{ClockPort, HealthCheckResult, LoggingPort};

use crate::config::FoundationConfig;
use crate::dispatch::{ClassificationTable, Dispatcher};
use crate::entity::AuditedEntity;
use crate::error::{Fault, FoundationError};
use crate::ports::StoragePort;
use crate::records::Records;
use crate::validation::{validate_id, RuleBook, RuleContext};

/// Validate-then-persist orchestration for one entity type
pub struct FoundationService<E: AuditedEntity> {
    storage: Arc<dyn StoragePort<E>>,
    clock: Arc<dyn ClockPort>,
    logger: Arc<dyn LoggingPort>,
    dispatcher: Dispatcher,
    rules: Arc<RuleBook<E>>,
    config: FoundationConfig,
}

impl<E: AuditedEntity> FoundationService<E> {
    /// Creates a service with the audit rule batteries, the default
    /// classification table and the default configuration
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage port for the entity type
    /// * `clock` - Source of the current instant for recency checks
    /// * `logger` - Sink for classified failures
    pub fn new(
        storage: Arc<dyn StoragePort<E>>,
        clock: Arc<dyn ClockPort>,
        logger: Arc<dyn LoggingPort>,
    ) -> Self {
        let dispatcher = Dispatcher::new(E::NAME, ClassificationTable::default(), Arc::clone(&logger));
        Self {
            storage,
            clock,
            logger,
            dispatcher,
            rules: Arc::new(RuleBook::audited()),
            config: FoundationConfig::default(),
        }
    }

    /// Replaces the rule batteries
    pub fn with_rules(mut self, rules: RuleBook<E>) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Replaces the classification table
    pub fn with_classification(mut self, table: ClassificationTable) -> Self {
        self.dispatcher = Dispatcher::new(E::NAME, table, Arc::clone(&self.logger));
        self
    }

    pub fn with_config(mut self, config: FoundationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(&self) -> &RuleBook<E> {
        &self.rules
    }

    pub fn config(&self) -> &FoundationConfig {
        &self.config
    }

    /// Validates a new entity and inserts it
    ///
    /// # Errors
    ///
    /// * `Validation` - `None` was supplied, or a creation rule failed
    /// * `DependencyValidation` - the id already exists, or a reference is
    ///   invalid
    /// * `CriticalDependency` - storage is unreachable
    #[instrument(skip_all, fields(entity = E::NAME))]
    pub async fn add(&self, entity: Option<E>) -> Result<E, FoundationError> {
        self.dispatcher.run(self.try_add(entity)).await
    }

    /// Describes a query over every stored entity
    ///
    /// The returned records are restartable: each execution queries storage
    /// again, and each failed execution is classified and logged on its own.
    #[instrument(skip_all, fields(entity = E::NAME))]
    pub fn retrieve_all(&self) -> Result<Records<E, FoundationError>, FoundationError> {
        self.dispatcher.run_query(|| {
            let dispatcher = self.dispatcher.clone();
            Ok(self
                .storage
                .select_all()
                .map_err(move |error| dispatcher.translate(Fault::from(error))))
        })
    }

    /// Looks up an entity by id
    ///
    /// # Errors
    ///
    /// * `Validation` - the id is empty, or nothing is stored under it
    #[instrument(skip_all, fields(entity = E::NAME, id = %id))]
    pub async fn retrieve_by_id(&self, id: E::Id) -> Result<E, FoundationError> {
        self.dispatcher.run(self.try_retrieve_by_id(id)).await
    }

    /// Validates a changed entity against itself and its stored version,
    /// then updates it
    ///
    /// # Errors
    ///
    /// * `Validation` - `None` was supplied, a modification rule failed, the
    ///   entity is not stored, or it disagrees with the stored version
    /// * `DependencyValidation` - the record changed underneath the update
    #[instrument(skip_all, fields(entity = E::NAME))]
    pub async fn modify(&self, entity: Option<E>) -> Result<E, FoundationError> {
        self.dispatcher.run(self.try_modify(entity)).await
    }

    /// Deletes the entity stored under `id` and returns it
    #[instrument(skip_all, fields(entity = E::NAME, id = %id))]
    pub async fn remove_by_id(&self, id: E::Id) -> Result<E, FoundationError> {
        self.dispatcher.run(self.try_remove_by_id(id)).await
    }

    /// Reports the health of the underlying storage
    pub async fn health_check(&self) -> HealthCheckResult {
        self.storage.health_check().await
    }

    async fn try_add(&self, entity: Option<E>) -> Result<E, Fault> {
        let entity = entity.ok_or(Fault::NullEntity)?;
        let context = self.context();
        self.rules.on_add().evaluate(&entity, &context).into_result()?;

        Ok(self.storage.insert(entity).await?)
    }

    async fn try_retrieve_by_id(&self, id: E::Id) -> Result<E, Fault> {
        validate_id(id)?;
        self.select_existing(id).await
    }

    async fn try_modify(&self, entity: Option<E>) -> Result<E, Fault> {
        let entity = entity.ok_or(Fault::NullEntity)?;
        let context = self.context();
        self.rules.on_modify().evaluate(&entity, &context).into_result()?;

        let stored = self.select_existing(entity.id()).await?;
        self.rules
            .against_storage()
            .evaluate(&entity, &context.with_stored(&stored))
            .into_result()?;

        Ok(self.storage.update(entity).await?)
    }

    async fn try_remove_by_id(&self, id: E::Id) -> Result<E, Fault> {
        validate_id(id)?;
        let stored = self.select_existing(id).await?;

        Ok(self.storage.delete(stored).await?)
    }

    async fn select_existing(&self, id: E::Id) -> Result<E, Fault> {
        self.storage
            .select_by_id(id)
            .await?
            .ok_or_else(|| Fault::not_found(id))
    }

    // Reads the clock; called once per add or modify, after the null check
    fn context(&self) -> RuleContext<'static, E> {
        RuleContext::new(self.clock.current_date_time(), self.config.recency_tolerance())
    }
}

impl<E: AuditedEntity> Clone for FoundationService<E> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
            logger: Arc::clone(&self.logger),
            dispatcher: self.dispatcher.clone(),
            rules: Arc::clone(&self.rules),
            config: self.config.clone(),
        }
    }
}

impl<E: AuditedEntity> fmt::Debug for FoundationService<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoundationService")
            .field("entity", &E::NAME)
            .field("dispatcher", &self.dispatcher)
            .field("rules", &self.rules)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Outcome;
    use crate::ports::mock::{FixedClock, InMemoryStorage, RecordingLogger, StorageOperation};
    use chrono::{Duration, Utc};
    use core_kernel::{AuditInfo, SchoolId, StorageError, UserId};

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

    struct Harness {
        storage: Arc<InMemoryStorage<Sample>>,
        clock: Arc<FixedClock>,
        logger: Arc<RecordingLogger>,
        service: FoundationService<Sample>,
    }

    fn harness() -> Harness {
        let storage = Arc::new(InMemoryStorage::<Sample>::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let logger = Arc::new(RecordingLogger::new());
        let service =
            FoundationService::<Sample>::new(storage.clone(), clock.clone(), logger.clone());
        Harness {
            storage,
            clock,
            logger,
            service,
        }
    }

    fn sample(at: chrono::DateTime<Utc>) -> Sample {
        Sample {
            id: SchoolId::new(),
            audit: AuditInfo::created(UserId::new(), at),
        }
    }

    #[tokio::test]
    async fn test_null_entity_skips_clock() {
        let h = harness();

        let error = h.service.add(None).await.unwrap_err();

        assert_eq!(error.outcome(), Outcome::Validation);
        assert_eq!(h.clock.reads(), 0);
        assert_eq!(h.storage.total_calls(), 0);
        assert_eq!(h.logger.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_modify_reads_clock_once() {
        let h = harness();
        let now = h.clock.current_date_time();
        let stored = sample(now - Duration::minutes(10));
        h.storage.insert(stored.clone()).await.unwrap();

        let mut changed = stored.clone();
        changed.audit = changed.audit.modified(changed.audit.created_by, now);
        let reads_before = h.clock.reads();

        let updated = h.service.modify(Some(changed.clone())).await.unwrap();

        assert_eq!(updated, changed);
        assert_eq!(h.clock.reads(), reads_before + 1);
        assert!(h.logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_all_classifies_each_execution() {
        let h = harness();
        let records = h.service.retrieve_all().unwrap();

        h.storage.fail_next(StorageOperation::SelectAll, StorageError::connection("offline"));
        let error = records.collect().await.unwrap_err();
        assert_eq!(error.outcome(), Outcome::CriticalDependency);

        assert!(records.collect().await.unwrap().is_empty());
        assert_eq!(h.logger.criticals().len(), 1);
        assert_eq!(h.storage.calls(StorageOperation::SelectAll), 1);
    }

    #[tokio::test]
    async fn test_health_check_reports_storage_health() {
        let h = harness();

        let health = h.service.health_check().await;

        assert_eq!(health.adapter_id, "in-memory-sample-storage");
        assert_eq!(health.status, core_kernel::AdapterHealth::Healthy);
        assert_eq!(h.storage.total_calls(), 0);
        assert!(h.logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_custom_table_is_used() {
        use crate::dispatch::{Classification, Severity};
        use crate::error::FaultKind;

        let h = harness();
        let table = ClassificationTable::new(
            vec![Classification::new(FaultKind::NotFound, Outcome::Dependency, Severity::Critical)],
            (Outcome::Service, Severity::Error),
        );
        let service = h.service.clone().with_classification(table);

        let error = service.retrieve_by_id(SchoolId::new()).await.unwrap_err();

        assert_eq!(error.outcome(), Outcome::Dependency);
        assert_eq!(h.logger.criticals().len(), 1);
    }
}
