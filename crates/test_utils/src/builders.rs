//! Test Data Builders
//!
//! Builders start from a valid, freshly created entity and let tests
//! override only the fields they care about.

use chrono::{DateTime, Utc};

use core_kernel::{AuditInfo, SchoolId, StudentId, UserId};
use domain_school::School;
use domain_student::Student;

use crate::fixtures::{NameFixtures, TemporalFixtures};

/// Builder for test schools
#[derive(Debug, Clone)]
pub struct SchoolBuilder {
    id: SchoolId,
    name: String,
    audit: AuditInfo,
}

impl Default for SchoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolBuilder {
    /// Creates a builder for a school created at [`TemporalFixtures::now`]
    pub fn new() -> Self {
        Self::created_at(TemporalFixtures::now())
    }

    /// Creates a builder for a school created at `at`
    pub fn created_at(at: DateTime<Utc>) -> Self {
        Self {
            id: SchoolId::new(),
            name: NameFixtures::school_name(),
            audit: AuditInfo::created(UserId::new(), at),
        }
    }

    pub fn with_id(mut self, id: SchoolId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the whole audit block
    pub fn with_audit(mut self, audit: AuditInfo) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_created_by(mut self, by: UserId) -> Self {
        self.audit.created_by = by;
        self
    }

    pub fn with_created_date(mut self, at: DateTime<Utc>) -> Self {
        self.audit.created_date = at;
        self
    }

    pub fn with_updated_by(mut self, by: UserId) -> Self {
        self.audit.updated_by = by;
        self
    }

    pub fn with_updated_date(mut self, at: DateTime<Utc>) -> Self {
        self.audit.updated_date = at;
        self
    }

    pub fn build(self) -> School {
        School {
            id: self.id,
            name: self.name,
            audit: self.audit,
        }
    }
}

/// Builder for test students
#[derive(Debug, Clone)]
pub struct StudentBuilder {
    id: StudentId,
    school_id: SchoolId,
    first_name: String,
    last_name: String,
    audit: AuditInfo,
}

impl Default for StudentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentBuilder {
    /// Creates a builder for a student created at [`TemporalFixtures::now`]
    pub fn new() -> Self {
        Self::created_at(TemporalFixtures::now())
    }

    /// Creates a builder for a student created at `at`
    pub fn created_at(at: DateTime<Utc>) -> Self {
        Self {
            id: StudentId::new(),
            school_id: SchoolId::new(),
            first_name: NameFixtures::first_name(),
            last_name: NameFixtures::last_name(),
            audit: AuditInfo::created(UserId::new(), at),
        }
    }

    pub fn with_id(mut self, id: StudentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_school_id(mut self, school_id: SchoolId) -> Self {
        self.school_id = school_id;
        self
    }

    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = name.into();
        self
    }

    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = name.into();
        self
    }

    pub fn with_audit(mut self, audit: AuditInfo) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_created_by(mut self, by: UserId) -> Self {
        self.audit.created_by = by;
        self
    }

    pub fn with_updated_date(mut self, at: DateTime<Utc>) -> Self {
        self.audit.updated_date = at;
        self
    }

    pub fn build(self) -> Student {
        Student {
            id: self.id,
            school_id: self.school_id,
            first_name: self.first_name,
            last_name: self.last_name,
            audit: self.audit,
        }
    }
}
