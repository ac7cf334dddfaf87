//! Custom Test Assertions
//!
//! Assertion helpers for classified failures that print the whole failure
//! when they do not match.

use std::fmt::Display;

use domain_foundation::{EntityFailure, FoundationError, Outcome};

/// Asserts that `error` was classified as `expected`
pub fn assert_outcome(error: &FoundationError, expected: Outcome) {
    assert_eq!(
        error.outcome(),
        expected,
        "Expected {:?} failure, got {:?}: {} ({})",
        expected,
        error.outcome(),
        error,
        error.failure()
    );
}

/// Asserts a validation failure whose field violations include `message`
/// under `field`
///
/// # Panics
///
/// Panics if the failure is not a validation failure, carries no field
/// violations, or lacks the message
pub fn assert_validation_error(error: &FoundationError, field: &str, message: &str) {
    assert_outcome(error, Outcome::Validation);
    let errors = error
        .validation_errors()
        .unwrap_or_else(|| panic!("Expected field violations, got: {}", error.failure()));
    assert!(
        errors.contains(field, message),
        "Expected \"{}\" on field {}, got: {}",
        message,
        field,
        errors
    );
}

/// Asserts that no violation is reported against `field`
pub fn assert_field_not_reported(error: &FoundationError, field: &str) {
    if let Some(errors) = error.validation_errors() {
        assert!(
            errors.get(field).is_none(),
            "Did not expect violations on {}, got: {}",
            field,
            errors
        );
    }
}

/// Asserts a validation failure caused by a null entity
pub fn assert_null_entity(error: &FoundationError) {
    assert_outcome(error, Outcome::Validation);
    assert!(
        matches!(error.failure(), EntityFailure::Null { .. }),
        "Expected null entity failure, got: {}",
        error.failure()
    );
}

/// Asserts a validation failure caused by a lookup that found nothing
pub fn assert_not_found(error: &FoundationError, id: impl Display) {
    assert_outcome(error, Outcome::Validation);
    match error.failure() {
        EntityFailure::NotFound { id: missing, .. } => assert_eq!(missing, &id.to_string()),
        other => panic!("Expected not found failure, got: {}", other),
    }
}
