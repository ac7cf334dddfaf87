//! School entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditInfo, SchoolId, UserId};
use domain_foundation::AuditedEntity;

/// A school registered in the campus registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub audit: AuditInfo,
}

impl School {
    /// Creates a school with a fresh id, stamped as created by `by` at `at`
    pub fn new(name: impl Into<String>, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            id: SchoolId::new_v7(),
            name: name.into(),
            audit: AuditInfo::created(by, at),
        }
    }

    /// Returns a copy renamed and stamped as modified by `by` at `at`
    pub fn renamed(&self, name: impl Into<String>, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            audit: self.audit.modified(by, at),
        }
    }
}

impl AuditedEntity for School {
    type Id = SchoolId;
    const NAME: &'static str = "School";

    fn id(&self) -> SchoolId {
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
    fn test_new_school_mirrors_creator() {
        let user = UserId::new();
        let now = Utc::now();
        let school = School::new("Northfield High", user, now);

        assert!(!school.id.is_empty());
        assert_eq!(school.audit.updated_by, user);
        assert_eq!(school.audit.updated_date, now);
    }

    #[test]
    fn test_renamed_keeps_identity_and_provenance() {
        let creator = UserId::new();
        let editor = UserId::new();
        let now = Utc::now();
        let school = School::new("Northfield High", creator, now);
        let renamed = school.renamed("Northfield Academy", editor, now + Duration::minutes(1));

        assert_eq!(renamed.id, school.id);
        assert_eq!(renamed.name, "Northfield Academy");
        assert_eq!(renamed.audit.created_by, creator);
        assert_eq!(renamed.audit.updated_by, editor);
    }

    #[test]
    fn test_serde_round_trip() {
        let school = School::new("Northfield High", UserId::new(), Utc::now());
        let json = serde_json::to_string(&school).unwrap();
        let back: School = serde_json::from_str(&json).unwrap();
        assert_eq!(back, school);
    }
}
