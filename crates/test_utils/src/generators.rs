//! Property-Based Test Generators
//!
//! Proptest strategies for registry entities and their audit metadata.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use core_kernel::{AuditInfo, SchoolId, StudentId, UserId};
use domain_school::School;
use domain_student::Student;

/// Strategy for non-empty UUIDs
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    (1u128..=u128::MAX).prop_map(Uuid::from_u128)
}

pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    uuid_strategy().prop_map(UserId::from_uuid)
}

pub fn school_id_strategy() -> impl Strategy<Value = SchoolId> {
    uuid_strategy().prop_map(SchoolId::from_uuid)
}

pub fn student_id_strategy() -> impl Strategy<Value = StudentId> {
    uuid_strategy().prop_map(StudentId::from_uuid)
}

/// Strategy for names that pass the text rule
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,15}( [A-Z][a-z]{1,15}){0,2}"
}

/// Strategy for text the text rule rejects
pub fn blank_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,6}"
}

/// Strategy for skews inside `tolerance`, both endpoints included
pub fn skew_within(tolerance: Duration) -> impl Strategy<Value = Duration> {
    let limit = tolerance.num_seconds().abs();
    prop_oneof![
        1 => Just(limit),
        1 => Just(-limit),
        8 => -limit..=limit,
    ]
    .prop_map(Duration::seconds)
}

/// Strategy for skews strictly outside `tolerance`, in either direction
pub fn skew_beyond(tolerance: Duration) -> impl Strategy<Value = Duration> {
    let limit = tolerance.num_seconds().abs();
    (limit + 1..limit + 86_400, any::<bool>())
        .prop_map(|(secs, ahead)| Duration::seconds(if ahead { secs } else { -secs }))
}

/// Strategy for audit metadata of an entity created at `at`
pub fn created_audit_strategy(at: DateTime<Utc>) -> impl Strategy<Value = AuditInfo> {
    user_id_strategy().prop_map(move |by| AuditInfo::created(by, at))
}

/// Which audit fields to leave unset; at least one is always chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsetAuditFields {
    pub created_by: bool,
    pub created_date: bool,
    pub updated_by: bool,
    pub updated_date: bool,
}

impl UnsetAuditFields {
    /// Clears the chosen fields of `audit`
    pub fn apply(&self, mut audit: AuditInfo) -> AuditInfo {
        let unset = AuditInfo::default();
        if self.created_by {
            audit.created_by = unset.created_by;
        }
        if self.created_date {
            audit.created_date = unset.created_date;
        }
        if self.updated_by {
            audit.updated_by = unset.updated_by;
        }
        if self.updated_date {
            audit.updated_date = unset.updated_date;
        }
        audit
    }
}

pub fn unset_audit_fields_strategy() -> impl Strategy<Value = UnsetAuditFields> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
        .prop_filter("at least one field unset", |(a, b, c, d)| *a || *b || *c || *d)
        .prop_map(|(created_by, created_date, updated_by, updated_date)| UnsetAuditFields {
            created_by,
            created_date,
            updated_by,
            updated_date,
        })
}

/// Strategy for valid schools created at `at`
pub fn school_strategy(at: DateTime<Utc>) -> impl Strategy<Value = School> {
    (school_id_strategy(), name_strategy(), created_audit_strategy(at))
        .prop_map(|(id, name, audit)| School { id, name, audit })
}

/// Strategy for valid students created at `at`
pub fn student_strategy(at: DateTime<Utc>) -> impl Strategy<Value = Student> {
    (
        student_id_strategy(),
        school_id_strategy(),
        name_strategy(),
        name_strategy(),
        created_audit_strategy(at),
    )
        .prop_map(|(id, school_id, first_name, last_name, audit)| Student {
            id,
            school_id,
            first_name,
            last_name,
            audit,
        })
}
