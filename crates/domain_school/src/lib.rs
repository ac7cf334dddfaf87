//! School Domain
//!
//! The [`School`] entity, its field rules and the [`SchoolService`]
//! instantiation of the generic foundation service.

pub mod school;
pub mod rules;
pub mod service;

pub use school::School;
pub use rules::school_rules;
pub use service::{school_service, SchoolService};
