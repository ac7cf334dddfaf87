//! Student field rules

use domain_foundation::validation::{is_invalid_id, is_invalid_text};
use domain_foundation::RuleBook;

use crate::student::Student;

pub mod fields {
    pub const FIRST_NAME: &str = "FirstName";
    pub const LAST_NAME: &str = "LastName";
    pub const SCHOOL_ID: &str = "SchoolId";
}

/// Audit batteries plus the student's own field rules
///
/// A student must carry both names and the id of the school it belongs
/// to. Whether that school exists is left to storage, which reports a
/// dangling reference as a foreign key violation.
pub fn student_rules() -> RuleBook<Student> {
    RuleBook::<Student>::audited()
        .with_field_rule(fields::FIRST_NAME, |student, _| is_invalid_text(&student.first_name))
        .with_field_rule(fields::LAST_NAME, |student, _| is_invalid_text(&student.last_name))
        .with_field_rule(fields::SCHOOL_ID, |student, _| is_invalid_id(student.school_id))
}
