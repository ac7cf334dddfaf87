//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, the empty sentinel, parsing,
//! conversion, and display formatting.

use core_kernel::{SchoolId, StudentId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod school_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = SchoolId::new();
        let id2 = SchoolId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = SchoolId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = SchoolId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SchoolId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(SchoolId::prefix(), "SCH");
        assert_eq!(StudentId::prefix(), "STU");
        assert_eq!(UserId::prefix(), "USR");
    }

    #[test]
    fn test_from_str_with_and_without_prefix() {
        let original = SchoolId::new();
        let with_prefix: SchoolId = original.to_string().parse().unwrap();
        let without_prefix: SchoolId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, with_prefix);
        assert_eq!(original, without_prefix);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("SCH-not-a-uuid".parse::<SchoolId>().is_err());
    }
}

mod empty_sentinel_tests {
    use super::*;

    #[test]
    fn test_empty_is_nil() {
        assert_eq!(*StudentId::empty().as_uuid(), Uuid::nil());
        assert!(StudentId::empty().is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(UserId::default(), UserId::empty());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = StudentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

proptest! {
    #[test]
    fn prop_only_nil_is_empty(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        prop_assert_eq!(UserId::from_uuid(uuid).is_empty(), uuid.is_nil());
    }
}
