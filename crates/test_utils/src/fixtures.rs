//! Pre-built Test Fixtures
//!
//! Ready-to-use entities and instants. Names come from `fake` so that
//! tests do not silently depend on a particular spelling.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use core_kernel::{AuditInfo, SchoolId, StudentId, UserId};
use domain_school::School;
use domain_student::Student;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant every fixed clock starts at (Mar 1, 2024 09:00 UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Well outside the default one-minute recency tolerance
    pub fn stale() -> DateTime<Utc> {
        Self::now() - Duration::days(30)
    }

    /// Recency tolerance used by services under test
    pub fn tolerance() -> Duration {
        Duration::minutes(1)
    }
}

/// Fixture for random but well-formed text
pub struct NameFixtures;

impl NameFixtures {
    pub fn school_name() -> String {
        CompanyName().fake()
    }

    pub fn first_name() -> String {
        FirstName().fake()
    }

    pub fn last_name() -> String {
        LastName().fake()
    }
}

/// Creates a school created and last modified at `at`
pub fn random_school(at: DateTime<Utc>) -> School {
    School {
        id: SchoolId::new(),
        name: NameFixtures::school_name(),
        audit: AuditInfo::created(UserId::new(), at),
    }
}

/// Creates a student of `school_id` created and last modified at `at`
pub fn random_student(school_id: SchoolId, at: DateTime<Utc>) -> Student {
    Student {
        id: StudentId::new(),
        school_id,
        first_name: NameFixtures::first_name(),
        last_name: NameFixtures::last_name(),
        audit: AuditInfo::created(UserId::new(), at),
    }
}

/// Returns a copy of `school` stamped as modified by its creator at `at`
pub fn modified_school(school: &School, at: DateTime<Utc>) -> School {
    School {
        audit: school.audit.modified(school.audit.created_by, at),
        ..school.clone()
    }
}

/// Returns a copy of `student` stamped as modified by its creator at `at`
pub fn modified_student(student: &Student, at: DateTime<Utc>) -> Student {
    Student {
        audit: student.audit.modified(student.audit.created_by, at),
        ..student.clone()
    }
}
