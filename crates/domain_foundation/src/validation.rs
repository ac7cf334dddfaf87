//! Validation rule engine
//!
//! Rules are ordered, strongly-typed descriptors: a field name plus a pure
//! function that inspects the entity (and, for cross-checks, the stored
//! version of it) and returns a violation message when the rule is broken.
//!
//! # Evaluation
//!
//! - Every rule in a [`RuleSet`] is evaluated; there is no short circuit.
//! - Messages accumulate per field in [`ValidationErrors`]; a field may
//!   collect more than one message.
//! - The outcome is a tagged [`ValidationOutcome`], never a boolean.
//!
//! # Batteries
//!
//! [`RuleBook::audited`] builds the three batteries every audited entity
//! shares:
//!
//! ## On add
//! - Id, CreatedDate, CreatedByUserId, UpdatedDate, UpdatedByUserId are set
//! - UpdatedDate equals CreatedDate, UpdatedByUserId equals CreatedByUserId
//! - CreatedDate is recent
//!
//! ## On modify
//! - Id and the four audit fields are set
//! - UpdatedDate differs from CreatedDate
//! - UpdatedDate is recent
//!
//! ## Against storage
//! - CreatedDate and CreatedByUserId match the stored values
//! - UpdatedDate differs from the stored UpdatedDate
//!
//! Entity-specific rules are appended with [`RuleBook::with_field_rule`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{is_within_tolerance, AuditInfo};

use crate::entity::{AuditedEntity, EntityId};

/// Violation message
pub type Message = Cow<'static, str>;

/// Canonical field names used in violation reports
pub mod fields {
    pub const ID: &str = "Id";
    pub const CREATED_DATE: &str = "CreatedDate";
    pub const CREATED_BY_USER_ID: &str = "CreatedByUserId";
    pub const UPDATED_DATE: &str = "UpdatedDate";
    pub const UPDATED_BY_USER_ID: &str = "UpdatedByUserId";
}

/// Violations accumulated during one validation pass, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the list recorded for `field`
    pub fn upsert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Returns the messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns true if `field` carries exactly this message
    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.get(field)
            .map(|messages| messages.iter().any(|m| m == message))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one violation
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded, the errors otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

/// Result of evaluating a [`RuleSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ValidationErrors),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(errors) => Err(errors),
        }
    }
}

/// Inputs a rule may consult besides the entity itself
#[derive(Debug)]
pub struct RuleContext<'a, E> {
    /// Current instant as read from the clock
    pub now: DateTime<Utc>,
    /// Accepted skew for recency checks
    pub tolerance: Duration,
    /// Previously stored version of the entity, for cross-checks
    pub stored: Option<&'a E>,
}

impl<'a, E> RuleContext<'a, E> {
    pub fn new(now: DateTime<Utc>, tolerance: Duration) -> Self {
        Self {
            now,
            tolerance,
            stored: None,
        }
    }

    /// Returns a context that also carries the stored entity
    pub fn with_stored<'b>(&self, stored: &'b E) -> RuleContext<'b, E> {
        RuleContext {
            now: self.now,
            tolerance: self.tolerance,
            stored: Some(stored),
        }
    }
}

/// Signature of a rule check
pub type RuleCheck<E> = for<'a> fn(&E, &RuleContext<'a, E>) -> Option<Message>;

/// A named rule: the field it reports against and its check
pub struct FieldRule<E> {
    field: &'static str,
    check: RuleCheck<E>,
}

impl<E> FieldRule<E> {
    pub const fn new(field: &'static str, check: RuleCheck<E>) -> Self {
        Self { field, check }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn apply(&self, entity: &E, context: &RuleContext<'_, E>) -> Option<Message> {
        (self.check)(entity, context)
    }
}

impl<E> Clone for FieldRule<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldRule<E> {}

impl<E> fmt::Debug for FieldRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule").field("field", &self.field).finish()
    }
}

/// Ordered battery of rules
pub struct RuleSet<E> {
    rules: Vec<FieldRule<E>>,
}

impl<E> RuleSet<E> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the end of the battery
    pub fn with(mut self, field: &'static str, check: RuleCheck<E>) -> Self {
        self.rules.push(FieldRule::new(field, check));
        self
    }

    pub fn push(&mut self, rule: FieldRule<E>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[FieldRule<E>] {
        &self.rules
    }

    /// Evaluates every rule in order and collects all violations
    pub fn evaluate(&self, entity: &E, context: &RuleContext<'_, E>) -> ValidationOutcome {
        let mut errors = ValidationErrors::new();

        for rule in &self.rules {
            if let Some(message) = rule.apply(entity, context) {
                errors.upsert(rule.field, message);
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(errors)
        }
    }
}

impl<E> Default for RuleSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RuleSet<E> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<E> fmt::Debug for RuleSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter().map(|r| r.field)).finish()
    }
}

// ============================================================================
// Conditions
// ============================================================================

pub fn is_invalid_id(id: impl EntityId) -> Option<Message> {
    id.is_empty().then_some(Cow::Borrowed("Id is required"))
}

pub fn is_invalid_date(date: &DateTime<Utc>) -> Option<Message> {
    AuditInfo::is_unset_date(date).then_some(Cow::Borrowed("Date is required"))
}

pub fn is_invalid_text(text: &str) -> Option<Message> {
    text.trim().is_empty().then_some(Cow::Borrowed("Text is required"))
}

pub fn is_not_same_date(
    first: &DateTime<Utc>,
    second: &DateTime<Utc>,
    second_name: &str,
) -> Option<Message> {
    (first != second).then(|| Cow::Owned(format!("Date is not the same as {}", second_name)))
}

pub fn is_same_date(
    first: &DateTime<Utc>,
    second: &DateTime<Utc>,
    second_name: &str,
) -> Option<Message> {
    (first == second).then(|| Cow::Owned(format!("Date is the same as {}", second_name)))
}

pub fn is_not_same_id<I: EntityId>(first: I, second: I, second_name: &str) -> Option<Message> {
    (first != second).then(|| Cow::Owned(format!("Id is not the same as {}", second_name)))
}

pub fn is_not_recent<E>(date: &DateTime<Utc>, context: &RuleContext<'_, E>) -> Option<Message> {
    (!is_within_tolerance(*date, context.now, context.tolerance))
        .then_some(Cow::Borrowed("Date is not recent"))
}

/// Validates an identifier on its own, for lookups by id
pub fn validate_id(id: impl EntityId) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(message) = is_invalid_id(id) {
        errors.upsert(fields::ID, message);
    }
    errors.into_result()
}

// ============================================================================
// Rule books
// ============================================================================

/// The three batteries a foundation service runs for one entity type
pub struct RuleBook<E> {
    on_add: RuleSet<E>,
    on_modify: RuleSet<E>,
    against_storage: RuleSet<E>,
}

impl<E: AuditedEntity> RuleBook<E> {
    /// Audit batteries shared by every entity
    pub fn audited() -> Self {
        let on_add = Self::required_fields()
            .with(fields::UPDATED_DATE, |e, _| {
                let audit = e.audit();
                is_not_same_date(&audit.updated_date, &audit.created_date, fields::CREATED_DATE)
            })
            .with(fields::UPDATED_BY_USER_ID, |e, _| {
                let audit = e.audit();
                is_not_same_id(audit.updated_by, audit.created_by, fields::CREATED_BY_USER_ID)
            })
            .with(fields::CREATED_DATE, |e, ctx| is_not_recent(&e.audit().created_date, ctx));

        let on_modify = Self::required_fields()
            .with(fields::UPDATED_DATE, |e, _| {
                let audit = e.audit();
                is_same_date(&audit.updated_date, &audit.created_date, fields::CREATED_DATE)
            })
            .with(fields::UPDATED_DATE, |e, ctx| is_not_recent(&e.audit().updated_date, ctx));

        let against_storage = RuleSet::<E>::new()
            .with(fields::CREATED_DATE, |e, ctx| {
                ctx.stored.and_then(|stored| {
                    is_not_same_date(
                        &e.audit().created_date,
                        &stored.audit().created_date,
                        fields::CREATED_DATE,
                    )
                })
            })
            .with(fields::CREATED_BY_USER_ID, |e, ctx| {
                ctx.stored.and_then(|stored| {
                    is_not_same_id(
                        e.audit().created_by,
                        stored.audit().created_by,
                        fields::CREATED_BY_USER_ID,
                    )
                })
            })
            .with(fields::UPDATED_DATE, |e, ctx| {
                ctx.stored.and_then(|stored| {
                    is_same_date(
                        &e.audit().updated_date,
                        &stored.audit().updated_date,
                        fields::UPDATED_DATE,
                    )
                })
            });

        Self {
            on_add,
            on_modify,
            against_storage,
        }
    }

    fn required_fields() -> RuleSet<E> {
        RuleSet::<E>::new()
            .with(fields::ID, |e, _| is_invalid_id(e.id()))
            .with(fields::CREATED_DATE, |e, _| is_invalid_date(&e.audit().created_date))
            .with(fields::CREATED_BY_USER_ID, |e, _| is_invalid_id(e.audit().created_by))
            .with(fields::UPDATED_DATE, |e, _| is_invalid_date(&e.audit().updated_date))
            .with(fields::UPDATED_BY_USER_ID, |e, _| is_invalid_id(e.audit().updated_by))
    }
}

impl<E> RuleBook<E> {
    /// Adds an entity-specific rule to both the add and modify batteries
    pub fn with_field_rule(mut self, field: &'static str, check: RuleCheck<E>) -> Self {
        let rule = FieldRule::new(field, check);
        self.on_add.push(rule);
        self.on_modify.push(rule);
        self
    }

    pub fn on_add(&self) -> &RuleSet<E> {
        &self.on_add
    }

    pub fn on_modify(&self) -> &RuleSet<E> {
        &self.on_modify
    }

    pub fn against_storage(&self) -> &RuleSet<E> {
        &self.against_storage
    }
}

impl<E: AuditedEntity> Default for RuleBook<E> {
    fn default() -> Self {
        Self::audited()
    }
}

impl<E> Clone for RuleBook<E> {
    fn clone(&self) -> Self {
        Self {
            on_add: self.on_add.clone(),
            on_modify: self.on_modify.clone(),
            against_storage: self.against_storage.clone(),
        }
    }
}

impl<E> fmt::Debug for RuleBook<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBook")
            .field("on_add", &self.on_add)
            .field("on_modify", &self.on_modify)
            .field("against_storage", &self.against_storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AuditInfo, SchoolId, UserId};

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        id: SchoolId,
        label: String,
        audit: AuditInfo,
    }

    impl AuditedEntity for Sample {
        type Id = SchoolId;
        const NAME: &'static str = "Sample";

        fn id(&self) -> SchoolId {
            self.id
        }

        fn audit(&self) -> &AuditInfo {
            &self.audit
        }
    }

    fn sample(now: DateTime<Utc>) -> Sample {
        Sample {
            id: SchoolId::new(),
            label: "North Campus".to_string(),
            audit: AuditInfo::created(UserId::new(), now),
        }
    }

    fn context<'a>(now: DateTime<Utc>) -> RuleContext<'a, Sample> {
        RuleContext::new(now, Duration::minutes(1))
    }

    #[test]
    fn test_valid_sample_passes_add() {
        let now = Utc::now();
        let book = RuleBook::<Sample>::audited();
        assert!(book.on_add().evaluate(&sample(now), &context(now)).is_valid());
    }

    #[test]
    fn test_all_rules_are_evaluated() {
        let now = Utc::now();
        let book = RuleBook::<Sample>::audited();
        let empty = Sample {
            id: SchoolId::empty(),
            label: String::new(),
            audit: AuditInfo::default(),
        };

        let errors = book.on_add().evaluate(&empty, &context(now)).into_result().unwrap_err();

        assert!(errors.contains(fields::ID, "Id is required"));
        assert!(errors.contains(fields::CREATED_DATE, "Date is required"));
        assert!(errors.contains(fields::CREATED_DATE, "Date is not recent"));
        assert!(errors.contains(fields::CREATED_BY_USER_ID, "Id is required"));
        assert!(errors.contains(fields::UPDATED_DATE, "Date is required"));
        assert!(errors.contains(fields::UPDATED_BY_USER_ID, "Id is required"));
    }

    #[test]
    fn test_field_rules_apply_to_add_and_modify() {
        let now = Utc::now();
        let book = RuleBook::<Sample>::audited().with_field_rule("Label", |p, _| is_invalid_text(&p.label));
        let mut subject = sample(now);
        subject.label = "   ".to_string();

        let add = book.on_add().evaluate(&subject, &context(now)).into_result().unwrap_err();
        assert!(add.contains("Label", "Text is required"));

        subject.audit = subject.audit.modified(subject.audit.created_by, now + Duration::seconds(1));
        let modify = book.on_modify().evaluate(&subject, &context(now)).into_result().unwrap_err();
        assert!(modify.contains("Label", "Text is required"));
        assert_eq!(book.against_storage().len(), 3);
    }

    #[test]
    fn test_storage_rules_skip_without_stored_entity() {
        let now = Utc::now();
        let book = RuleBook::<Sample>::audited();
        assert!(book.against_storage().evaluate(&sample(now), &context(now)).is_valid());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(SchoolId::new()).is_ok());
        let errors = validate_id(SchoolId::empty()).unwrap_err();
        assert_eq!(errors.get(fields::ID), Some(&["Id is required".to_string()][..]));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.upsert("Id", "Id is required");
        errors.upsert("UpdatedDate", "Date is required");
        errors.upsert("UpdatedDate", "Date is not recent");

        assert_eq!(
            errors.to_string(),
            "Id: Id is required; UpdatedDate: Date is required, Date is not recent"
        );
        assert_eq!(errors.field_count(), 2);
    }

    #[test]
    fn test_recency_window_is_inclusive() {
        let now = Utc::now();
        let tolerance = Duration::minutes(1);
        let ctx = context(now);

        assert!(is_not_recent(&(now - tolerance), &ctx).is_none());
        assert!(is_not_recent(&(now + tolerance), &ctx).is_none());
        assert!(is_not_recent(&(now - tolerance - Duration::seconds(1)), &ctx).is_some());
        assert!(is_not_recent(&(now + tolerance + Duration::seconds(1)), &ctx).is_some());
    }

    proptest::proptest! {
        #[test]
        fn prop_recency_agrees_with_skew(skew_secs in -180i64..=180) {
            let now = Utc::now();
            let date = now + Duration::seconds(skew_secs);

            let reported = is_not_recent(&date, &context(now)).is_some();

            proptest::prop_assert_eq!(reported, skew_secs.abs() > 60);
        }

        #[test]
        fn prop_blank_text_is_required(text in "[ \t\n]{0,8}") {
            let result = is_invalid_text(&text);
            proptest::prop_assert_eq!(result.as_deref(), Some("Text is required"));
        }
    }
}
