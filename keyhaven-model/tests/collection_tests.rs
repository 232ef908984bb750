use keyhaven_model::{
    sanitize_request_dtos, sanitize_response_dtos, AccountRecoveryRequest,
    AccountRecoveryRequestDto, AccountRecoveryRequestsCollection, AccountRecoveryResponse,
    AccountRecoveryResponseDraft, AccountRecoveryResponseDto, AccountRecoveryResponsesCollection,
    ModelError, RequestStatus, ResponseStatus, FOREIGN_MODEL_ORGANIZATION_KEY,
    PGP_MESSAGE_PREFIX, PGP_PUBLIC_KEY_PREFIX,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn request_dto(id: &str) -> AccountRecoveryRequestDto {
    AccountRecoveryRequestDto {
        id: Some(id.to_string()),
        user_id: Some(Uuid::new_v4().to_string()),
        armored_key: Some(format!("{PGP_PUBLIC_KEY_PREFIX}\n...")),
        fingerprint: Some("00AB".repeat(10)),
        status: Some("pending".to_string()),
        ..Default::default()
    }
}

fn response_dto(id: Option<&str>, status: &str) -> AccountRecoveryResponseDto {
    AccountRecoveryResponseDto {
        id: id.map(str::to_string),
        account_recovery_request_id: Some(Uuid::new_v4().to_string()),
        responder_foreign_key: Some(Uuid::new_v4().to_string()),
        responder_foreign_model: Some(FOREIGN_MODEL_ORGANIZATION_KEY.to_string()),
        status: Some(status.to_string()),
        data: (status == "approved").then(|| format!("{PGP_MESSAGE_PREFIX}\n...")),
        ..Default::default()
    }
}

// ── Round-trips ──────────────────────────────────────────────────

#[test]
fn request_dto_round_trips() {
    let dto = request_dto(&Uuid::new_v4().to_string());
    let entity = AccountRecoveryRequest::from_dto(dto.clone()).unwrap();
    assert_eq!(entity.to_dto(), dto);
    assert_eq!(entity.status(), RequestStatus::Pending);
}

// The server embeds `[]` for a requested association with no rows; that is
// distinct from leaving the association out, and both shapes must survive
// a dto -> entity -> dto round-trip unchanged.
#[test]
fn empty_embedded_associations_round_trip() {
    let mut dto = request_dto(&Uuid::new_v4().to_string());
    dto.account_recovery_private_key_passwords = Some(Vec::new());
    dto.account_recovery_responses = Some(Vec::new());

    let entity = AccountRecoveryRequest::from_dto(dto.clone()).unwrap();
    assert_eq!(entity.to_dto(), dto);
    assert!(entity.private_key_passwords().is_some_and(|p| p.is_empty()));
    assert!(entity.responses().is_empty());
}

#[test]
fn absent_associations_stay_absent() {
    let dto = request_dto(&Uuid::new_v4().to_string());
    let entity = AccountRecoveryRequest::from_dto(dto.clone()).unwrap();

    assert_eq!(entity.to_dto(), dto);
    assert!(entity.private_key_passwords().is_none());
}

#[test]
fn response_dto_round_trips() {
    let dto = response_dto(Some(&Uuid::new_v4().to_string()), "approved");
    let entity = AccountRecoveryResponse::from_dto(dto.clone()).unwrap();
    assert_eq!(entity.to_dto(), dto);
    assert_eq!(entity.status(), ResponseStatus::Approved);
}

// ── Validation aggregation ───────────────────────────────────────

#[test]
fn draft_reports_all_missing_fields_at_once() {
    let err = AccountRecoveryResponseDraft::from_dto(&AccountRecoveryResponseDto::default())
        .unwrap_err();
    let ModelError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    let fields: Vec<&str> = errors.fields().collect();
    assert_eq!(
        fields,
        vec![
            "account_recovery_request_id",
            "responder_foreign_key",
            "responder_foreign_model",
            "status",
        ]
    );
}

#[test]
fn request_embeds_nested_password_errors() {
    let mut dto = request_dto(&Uuid::new_v4().to_string());
    dto.account_recovery_private_key_passwords = Some(vec![Default::default()]);

    let err = AccountRecoveryRequest::from_dto(dto).unwrap_err();
    let ModelError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors
        .get("account_recovery_private_key_passwords.0.recipient_fingerprint")
        .is_some());
    assert!(errors
        .get("account_recovery_private_key_passwords.0.data")
        .is_some());
}

#[test]
fn rejected_response_must_not_carry_data() {
    let mut dto = response_dto(None, "rejected");
    dto.data = Some(format!("{PGP_MESSAGE_PREFIX}\n..."));
    let err = AccountRecoveryResponse::from_dto(dto).unwrap_err();
    let ModelError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.get("data").is_some());
}

#[test]
fn approved_response_requires_data() {
    let mut dto = response_dto(None, "approved");
    dto.data = None;
    assert!(AccountRecoveryResponse::from_dto(dto).is_err());
}

// ── Status transitions ───────────────────────────────────────────

#[test]
fn only_pending_requests_can_be_reviewed() {
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Completed));
    assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Rejected));
    assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::Approved));
}

// ── Collection uniqueness ────────────────────────────────────────

#[test]
fn duplicate_request_ids_fail_atomically() {
    let id = Uuid::new_v4().to_string();
    let err = AccountRecoveryRequestsCollection::from_dtos(vec![
        request_dto(&id),
        request_dto(&Uuid::new_v4().to_string()),
        request_dto(&id),
    ])
    .unwrap_err();

    match err {
        ModelError::DuplicateId(dup) => assert_eq!(dup, id),
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn duplicate_response_ids_fail_atomically() {
    let id = Uuid::new_v4().to_string();
    let err = AccountRecoveryResponsesCollection::from_dtos(vec![
        response_dto(Some(&id), "rejected"),
        response_dto(Some(&id), "rejected"),
    ])
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateId(_)));
}

#[test]
fn unique_ids_build_collection() {
    let collection = AccountRecoveryRequestsCollection::from_dtos(vec![
        request_dto(&Uuid::new_v4().to_string()),
        request_dto(&Uuid::new_v4().to_string()),
    ])
    .unwrap();
    assert_eq!(collection.len(), 2);
}

// ── Sanitization ─────────────────────────────────────────────────

#[test]
fn sanitize_drops_repeats_and_is_idempotent() {
    let id = Uuid::new_v4().to_string();
    let dtos = vec![
        request_dto(&id),
        request_dto(&Uuid::new_v4().to_string()),
        request_dto(&id),
    ];

    let once = sanitize_request_dtos(dtos);
    assert_eq!(once.len(), 2);
    let twice = sanitize_request_dtos(once.clone());
    assert_eq!(twice, once);

    // Sanitized output always satisfies the strict constructor.
    assert!(AccountRecoveryRequestsCollection::from_dtos(twice).is_ok());
}

#[test]
fn sanitize_keeps_first_occurrence() {
    let id = Uuid::new_v4().to_string();
    let mut first = response_dto(Some(&id), "rejected");
    first.responder_foreign_key = Some(Uuid::nil().to_string());
    let second = response_dto(Some(&id), "rejected");

    let sanitized = sanitize_response_dtos(vec![first.clone(), second]);
    assert_eq!(sanitized, vec![first]);
}
