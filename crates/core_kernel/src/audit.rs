//! Audit metadata carried by every persisted entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

/// Who created and last modified an entity, and when
///
/// The default value has every field unset: empty user ids and the
/// default (epoch) timestamp. Validation treats those values as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_by: UserId,
    pub created_date: DateTime<Utc>,
    pub updated_by: UserId,
    pub updated_date: DateTime<Utc>,
}

impl AuditInfo {
    /// Audit metadata for a freshly created entity
    ///
    /// The modifier and modification timestamp mirror the creator and
    /// creation timestamp.
    pub fn created(by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            created_by: by,
            created_date: at,
            updated_by: by,
            updated_date: at,
        }
    }

    /// Returns a copy stamped as modified by `by` at `at`
    pub fn modified(self, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            updated_by: by,
            updated_date: at,
            ..self
        }
    }

    /// Returns true if the timestamp is the unset default
    pub fn is_unset_date(date: &DateTime<Utc>) -> bool {
        *date == DateTime::<Utc>::default()
    }
}
