//! Student entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditInfo, SchoolId, StudentId, UserId};
use domain_foundation::AuditedEntity;

/// A student enrolled at a school
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub school_id: SchoolId,
    pub first_name: String,
    pub last_name: String,
    pub audit: AuditInfo,
}

impl Student {
    /// Creates a student with a fresh id, stamped as created by `by` at `at`
    pub fn new(
        school_id: SchoolId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        by: UserId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StudentId::new_v7(),
            school_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            audit: AuditInfo::created(by, at),
        }
    }

    /// Returns a copy moved to another school, stamped as modified
    pub fn transferred(&self, school_id: SchoolId, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            school_id,
            audit: self.audit.modified(by, at),
            ..self.clone()
        }
    }
}

impl AuditedEntity for Student {
    type Id = StudentId;
    const NAME: &'static str = "Student";

    fn id(&self) -> StudentId {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_serde_round_trip_keeps_school_reference() {
        let school_id = SchoolId::new();
        let student = Student::new(school_id, "Ada", "Lovelace", UserId::new(), Utc::now());

        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["first_name"], "Ada");
        assert!(json.get("school_id").is_some());

        let back: Student = serde_json::from_value(json).unwrap();
        assert_eq!(back, student);
        assert_eq!(back.school_id, school_id);
    }

    #[test]
    fn test_transferred_changes_only_school_and_modifier() {
        let now = Utc::now();
        let student = Student::new(SchoolId::new(), "Ada", "Lovelace", UserId::new(), now);
        let target = SchoolId::new();
        let editor = UserId::new();
        let moved = student.transferred(target, editor, now + Duration::seconds(30));

        assert_eq!(moved.id, student.id);
        assert_eq!(moved.school_id, target);
        assert_eq!(moved.first_name, student.first_name);
        assert_eq!(moved.audit.created_by, student.audit.created_by);
        assert_eq!(moved.audit.updated_by, editor);
    }
}
