//! Property-based tests for the school service

use std::future::Future;

use chrono::Duration;
use proptest::prelude::*;

use core_kernel::{SchoolId, StorageError};
use domain_foundation::{fields, LogLevel, Outcome, StorageOperation};
use test_utils::{
    modified_school, school_harness, school_strategy, skew_beyond, skew_within,
    unset_audit_fields_strategy, TemporalFixtures,
};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

fn storage_operation_strategy() -> impl Strategy<Value = StorageOperation> {
    prop_oneof![
        Just(StorageOperation::Insert),
        Just(StorageOperation::SelectAll),
        Just(StorageOperation::SelectById),
        Just(StorageOperation::Update),
        Just(StorageOperation::Delete),
    ]
}

proptest! {
    #[test]
    fn prop_add_returns_what_storage_persisted(school in school_strategy(TemporalFixtures::now())) {
        let h = school_harness();

        let added = block_on(h.service.add(Some(school.clone()))).unwrap();
        let stored = block_on(h.storage.get(school.id));

        prop_assert_eq!(&added, &school);
        prop_assert_eq!(stored, Some(school));
    }

    #[test]
    fn prop_empty_id_is_rejected_without_storage_calls(
        school in school_strategy(TemporalFixtures::now()),
    ) {
        let h = school_harness();
        let mut school = school;
        school.id = SchoolId::empty();

        let add = block_on(h.service.add(Some(school.clone()))).unwrap_err();
        let modify = block_on(h.service.modify(Some(modified_school(
            &school,
            TemporalFixtures::now() + Duration::seconds(1),
        ))))
        .unwrap_err();
        let retrieve = block_on(h.service.retrieve_by_id(school.id)).unwrap_err();
        let remove = block_on(h.service.remove_by_id(school.id)).unwrap_err();

        for error in [&add, &modify, &retrieve, &remove] {
            prop_assert_eq!(error.outcome(), Outcome::Validation);
            let errors = error.validation_errors().expect("field violations");
            prop_assert!(errors.contains(fields::ID, "Id is required"));
        }
        prop_assert_eq!(h.storage.total_calls(), 0);
        prop_assert_eq!(h.logger.count(LogLevel::Error), 4);
    }

    #[test]
    fn prop_unset_audit_fields_are_reported_together(
        school in school_strategy(TemporalFixtures::now()),
        unset in unset_audit_fields_strategy(),
    ) {
        let h = school_harness();
        let mut school = school;
        school.audit = unset.apply(school.audit);

        let error = block_on(h.service.add(Some(school))).unwrap_err();
        let errors = error.validation_errors().expect("field violations");

        prop_assert_eq!(
            errors.contains(fields::CREATED_BY_USER_ID, "Id is required"),
            unset.created_by
        );
        prop_assert_eq!(errors.contains(fields::CREATED_DATE, "Date is required"), unset.created_date);
        prop_assert_eq!(
            errors.contains(fields::UPDATED_BY_USER_ID, "Id is required"),
            unset.updated_by
        );
        prop_assert_eq!(errors.contains(fields::UPDATED_DATE, "Date is required"), unset.updated_date);
        prop_assert_eq!(h.logger.entries().len(), 1);
        prop_assert_eq!(h.storage.total_calls(), 0);
    }

    #[test]
    fn prop_created_date_within_tolerance_is_recent(
        skew in skew_within(TemporalFixtures::tolerance()),
        school in school_strategy(TemporalFixtures::now()),
    ) {
        let h = school_harness();
        h.clock.set(TemporalFixtures::now() + skew);

        prop_assert!(block_on(h.service.add(Some(school))).is_ok());
    }

    #[test]
    fn prop_created_date_beyond_tolerance_is_not_recent(
        skew in skew_beyond(TemporalFixtures::tolerance()),
        school in school_strategy(TemporalFixtures::now()),
    ) {
        let h = school_harness();
        h.clock.set(TemporalFixtures::now() + skew);

        let error = block_on(h.service.add(Some(school))).unwrap_err();
        let errors = error.validation_errors().expect("field violations");

        prop_assert!(errors.contains(fields::CREATED_DATE, "Date is not recent"));
        prop_assert_eq!(h.storage.total_calls(), 0);
    }

    #[test]
    fn prop_resubmitting_stored_school_never_updates(
        school in school_strategy(TemporalFixtures::now() - Duration::minutes(10)),
    ) {
        let h = school_harness();
        let stored = modified_school(&school, TemporalFixtures::now());
        block_on(h.seed(stored.clone()));

        let error = block_on(h.service.modify(Some(stored))).unwrap_err();
        let errors = error.validation_errors().expect("field violations");

        prop_assert!(errors.contains(fields::UPDATED_DATE, "Date is the same as UpdatedDate"));
        prop_assert_eq!(h.storage.calls(StorageOperation::Update), 0);
    }

    #[test]
    fn prop_connection_failures_are_critical_and_final(
        operation in storage_operation_strategy(),
        school in school_strategy(TemporalFixtures::now() - Duration::minutes(10)),
    ) {
        let h = school_harness();
        block_on(h.seed(school.clone()));
        h.storage.fail_next(operation, StorageError::connection("connection reset"));
        let calls_before = h.storage.total_calls();

        let result = match operation {
            StorageOperation::Insert => {
                let fresh = test_utils::random_school(TemporalFixtures::now());
                block_on(h.service.add(Some(fresh))).map(|_| ())
            }
            StorageOperation::SelectAll => match h.service.retrieve_all() {
                Ok(records) => block_on(records.collect()).map(|_| ()),
                Err(error) => Err(error),
            },
            StorageOperation::SelectById => block_on(h.service.retrieve_by_id(school.id)).map(|_| ()),
            StorageOperation::Update => {
                let input = modified_school(&school, TemporalFixtures::now());
                block_on(h.service.modify(Some(input))).map(|_| ())
            }
            StorageOperation::Delete => block_on(h.service.remove_by_id(school.id)).map(|_| ()),
        };

        let error = result.unwrap_err();
        prop_assert_eq!(error.outcome(), Outcome::CriticalDependency);
        prop_assert_eq!(h.logger.count(LogLevel::Critical), 1);
        prop_assert_eq!(h.logger.entries().len(), 1);

        // The failing call is the last storage call made
        let made = h.storage.total_calls() - calls_before;
        let expected = match operation {
            StorageOperation::Update | StorageOperation::Delete => 2,
            _ => 1,
        };
        prop_assert_eq!(made, expected);
        prop_assert_eq!(h.storage.calls(operation), 1);
    }
}
