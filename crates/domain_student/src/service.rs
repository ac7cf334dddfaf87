//! Student foundation service

use std::sync::Arc;

use core_kernel::{ClockPort, LoggingPort};
use domain_foundation::{FoundationService, StoragePort};

use crate::rules::student_rules;
use crate::student::Student;

pub type StudentService = FoundationService<Student>;

/// Builds a student service with the student rule batteries
pub fn student_service(
    storage: Arc<dyn StoragePort<Student>>,
    clock: Arc<dyn ClockPort>,
    logger: Arc<dyn LoggingPort>,
) -> StudentService {
    FoundationService::new(storage, clock, logger).with_rules(student_rules())
}
