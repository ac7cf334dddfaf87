//! School field rules

use domain_foundation::validation::is_invalid_text;
use domain_foundation::RuleBook;

use crate::school::School;

pub mod fields {
    pub const NAME: &str = "Name";
}

/// Audit batteries plus the school's own field rules
pub fn school_rules() -> RuleBook<School> {
    RuleBook::<School>::audited()
        .with_field_rule(fields::NAME, |school, _| is_invalid_text(&school.name))
}
