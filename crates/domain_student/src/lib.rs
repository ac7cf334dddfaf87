//! Student Domain
//!
//! The [`Student`] entity, its field rules and the [`StudentService`]
//! instantiation of the generic foundation service. Students reference
//! their school by [`core_kernel::SchoolId`].

pub mod student;
pub mod rules;
pub mod service;

pub use student::Student;
pub use rules::student_rules;
pub use service::{student_service, StudentService};
