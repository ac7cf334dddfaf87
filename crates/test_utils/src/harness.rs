//! Service Harness
//!
//! Wires a foundation service to in-memory storage, a fixed clock and a
//! recording logger, and keeps handles to all three for assertions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use domain_foundation::{
    AuditedEntity, FixedClock, FoundationService, InMemoryStorage, RecordingLogger,
};
use domain_school::{school_service, School, SchoolService};
use domain_student::{student_service, Student, StudentService};

use crate::fixtures::TemporalFixtures;

/// A service under test together with its doubles
pub struct ServiceHarness<E: AuditedEntity> {
    pub storage: Arc<InMemoryStorage<E>>,
    pub clock: Arc<FixedClock>,
    pub logger: Arc<RecordingLogger>,
    pub service: FoundationService<E>,
}

impl<E: AuditedEntity> ServiceHarness<E> {
    /// Seeds storage directly, bypassing the service and the call counters
    pub async fn seed(&self, entity: E) {
        self.storage.seed([entity]).await;
    }
}

fn doubles<E: AuditedEntity>(
    now: DateTime<Utc>,
) -> (Arc<InMemoryStorage<E>>, Arc<FixedClock>, Arc<RecordingLogger>) {
    (
        Arc::new(InMemoryStorage::new()),
        Arc::new(FixedClock::new(now)),
        Arc::new(RecordingLogger::new()),
    )
}

/// A school service whose clock reads [`TemporalFixtures::now`]
pub fn school_harness() -> ServiceHarness<School> {
    let (storage, clock, logger) = doubles::<School>(TemporalFixtures::now());
    let service: SchoolService = school_service(storage.clone(), clock.clone(), logger.clone());
    ServiceHarness {
        storage,
        clock,
        logger,
        service,
    }
}

/// A student service whose clock reads [`TemporalFixtures::now`]
pub fn student_harness() -> ServiceHarness<Student> {
    let (storage, clock, logger) = doubles::<Student>(TemporalFixtures::now());
    let service: StudentService = student_service(storage.clone(), clock.clone(), logger.clone());
    ServiceHarness {
        storage,
        clock,
        logger,
        service,
    }
}
