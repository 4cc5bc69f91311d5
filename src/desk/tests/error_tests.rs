//! Tests for the desk error taxonomy and response envelope.

use crate::catalog::{domain::CatalogName, ports::CatalogRepositoryError};
use crate::desk::{DeskError, DeskErrorKind, DeskResponse, DeskResult};
use crate::gira::{
    domain::{GiraDomainError, GiraId, QueueEntryId, QueueStatus},
    ports::{GiraRepositoryError, QueueRepositoryError},
    services::GiraServiceError,
};
use crate::identity::services::AuthServiceError;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn store_failures_hide_their_cause() {
    let err = DeskError::from(CatalogRepositoryError::persistence(std::io::Error::other(
        "password authentication failed for user terreiro",
    )));

    assert_eq!(err.kind(), DeskErrorKind::Internal);
    assert_eq!(err.message(), "internal error");
}

#[rstest]
fn pending_entries_map_to_precondition_failed() {
    let err = DeskError::from(GiraServiceError::Gira(GiraRepositoryError::PendingEntries {
        gira_id: GiraId::new(),
        pending: 2,
    }));

    assert_eq!(err.kind(), DeskErrorKind::PreconditionFailed);
    assert_eq!(
        err.message(),
        "cannot close while consultants are waiting or in service"
    );
}

#[rstest]
#[case(
    GiraServiceError::Domain(GiraDomainError::InvalidTransition {
        entry_id: QueueEntryId::new(),
        from: QueueStatus::Done,
        to: QueueStatus::Canceled,
    }),
    DeskErrorKind::PreconditionFailed
)]
#[case(
    GiraServiceError::Domain(GiraDomainError::ConsultantNameTooShort(String::new())),
    DeskErrorKind::ValidationFailed
)]
#[case(GiraServiceError::EntryNotFound(QueueEntryId::new()), DeskErrorKind::NotFound)]
#[case(
    GiraServiceError::Queue(QueueRepositoryError::SequenceConflict(GiraId::new())),
    DeskErrorKind::Conflict
)]
#[case(
    GiraServiceError::Queue(QueueRepositoryError::GiraClosed(GiraId::new())),
    DeskErrorKind::PreconditionFailed
)]
#[case(
    GiraServiceError::Queue(QueueRepositoryError::StaleEntry {
        entry_id: QueueEntryId::new(),
        expected: QueueStatus::Waiting,
        actual: QueueStatus::Canceled,
    }),
    DeskErrorKind::Conflict
)]
fn gira_errors_map_onto_the_taxonomy(
    #[case] source: GiraServiceError,
    #[case] expected: DeskErrorKind,
) {
    assert_eq!(DeskError::from(source).kind(), expected);
}

#[rstest]
#[case(AuthServiceError::InvalidCredentials, DeskErrorKind::Unauthenticated)]
#[case(AuthServiceError::Unauthenticated, DeskErrorKind::Unauthenticated)]
#[case(AuthServiceError::AlreadyBootstrapped, DeskErrorKind::PreconditionFailed)]
fn auth_errors_map_onto_the_taxonomy(
    #[case] source: AuthServiceError,
    #[case] expected: DeskErrorKind,
) {
    assert_eq!(DeskError::from(source).kind(), expected);
}

#[rstest]
fn duplicate_catalog_name_is_a_conflict() {
    let name = CatalogName::new("Caboclo").expect("valid name");
    let err = DeskError::from(CatalogRepositoryError::DuplicateName(name));
    assert_eq!(err.kind(), DeskErrorKind::Conflict);
}

#[rstest]
fn success_envelope_carries_data() {
    let response = DeskResponse::from(DeskResult::Ok(vec![1, 2]));

    assert!(response.is_ok());
    assert_eq!(
        serde_json::to_value(&response).expect("serializes"),
        json!({ "ok": true, "data": [1, 2] })
    );
}

#[rstest]
fn failure_envelope_carries_kind_and_message() {
    let response: DeskResponse<()> = DeskResponse::from(Err(DeskError::new(
        DeskErrorKind::NotFound,
        "gira not found",
    )));

    assert!(!response.is_ok());
    assert_eq!(
        serde_json::to_value(&response).expect("serializes"),
        json!({
            "ok": false,
            "error": { "kind": "not_found", "message": "gira not found" }
        })
    );
}

#[rstest]
fn envelope_converts_back_into_a_result() {
    let success = DeskResponse::from(DeskResult::Ok(String::from("Maria")));
    assert_eq!(success.into_result().expect("success"), "Maria");

    let failure: DeskResponse<String> = DeskResponse::Failure(DeskError::new(
        DeskErrorKind::Conflict,
        "entry changed concurrently",
    ));
    let err = failure.into_result().expect_err("failure");
    assert_eq!(err.kind(), DeskErrorKind::Conflict);
}
