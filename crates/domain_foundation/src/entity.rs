//! Entity contract shared by every foundation service

use std::fmt;
use std::hash::Hash;

use core_kernel::{AuditInfo, SchoolId, StudentId, UserId};

/// Identifier with a reserved empty value
pub trait EntityId: Copy + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Returns true if this is the empty (unset) identifier
    fn is_empty(&self) -> bool;
}

macro_rules! impl_entity_id {
    ($($name:ty),+ $(,)?) => {
        $(
            impl EntityId for $name {
                fn is_empty(&self) -> bool {
                    <$name>::is_empty(self)
                }
            }
        )+
    };
}

impl_entity_id!(SchoolId, StudentId, UserId);

/// An entity persisted through a foundation service
///
/// Implementors expose their identifier and audit metadata; the generic
/// validation batteries only ever look at those two.
pub trait AuditedEntity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Identifier type of the entity
    type Id: EntityId;

    /// Name used in failure messages, e.g. `"School"`
    const NAME: &'static str;

    /// Returns the entity identifier
    fn id(&self) -> Self::Id;

    /// Returns the audit metadata
    fn audit(&self) -> &AuditInfo;
}
