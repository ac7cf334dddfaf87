//! School foundation service

use std::sync::Arc;

use core_kernel::{ClockPort, LoggingPort};
use domain_foundation::{FoundationService, StoragePort};

use crate::rules::school_rules;
use crate::school::School;

pub type SchoolService = FoundationService<School>;

/// Builds a school service with the school rule batteries
///
/// # Arguments
///
/// * `storage` - School storage port
/// * `clock` - Clock used for recency checks
/// * `logger` - Sink for classified failures
pub fn school_service(
    storage: Arc<dyn StoragePort<School>>,
    clock: Arc<dyn ClockPort>,
    logger: Arc<dyn LoggingPort>,
) -> SchoolService {
    FoundationService::new(storage, clock, logger).with_rules(school_rules())
}
