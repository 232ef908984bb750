use keyhaven_model::{AccountRecoveryResponseDto, FOREIGN_MODEL_ORGANIZATION_KEY};
use keyhaven_recovery::{
    AccountRecoveryGateway, GatewayConfig, RecoveryApiClient, RecoveryError, RequestProjection,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> RecoveryApiClient {
    RecoveryApiClient::new(GatewayConfig::new(server.uri()))
}

#[tokio::test]
async fn find_request_sends_contain_params_and_parses_the_dto() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/account-recovery/requests/{id}.json")))
        .and(query_param(
            "contain[account_recovery_private_key_passwords]",
            "1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "user_id": Uuid::new_v4().to_string(),
            "armored_key": "-----BEGIN PGP PUBLIC KEY BLOCK-----\n...",
            "status": "pending",
            "account_recovery_private_key_passwords": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dto = client_for(&server)
        .await
        .find_request(id, RequestProjection::for_review())
        .await
        .unwrap();

    assert_eq!(dto.id, Some(id.to_string()));
    assert_eq!(dto.status, Some("pending".to_string()));
    assert_eq!(dto.account_recovery_private_key_passwords, Some(Vec::new()));
}

#[tokio::test]
async fn find_request_with_creator_embeds_the_user() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/account-recovery/requests/{id}.json")))
        .and(query_param("contain[creator]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "status": "pending",
            "creator": { "id": Uuid::new_v4().to_string(), "username": "ada" },
        })))
        .mount(&server)
        .await;

    let dto = client_for(&server)
        .await
        .find_request(id, RequestProjection::with_creator())
        .await
        .unwrap();

    assert_eq!(dto.creator.unwrap().username, Some("ada".to_string()));
}

#[tokio::test]
async fn find_request_maps_404_to_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/account-recovery/requests/{id}.json")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .find_request(id, RequestProjection::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RecoveryError::NotFound(_)));
}

#[tokio::test]
async fn find_request_maps_500_to_api_error() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/account-recovery/requests/{id}.json")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .find_request(id, RequestProjection::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RecoveryError::Api(_)));
}

#[tokio::test]
async fn find_requests_by_user_sends_the_has_users_filter() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/account-recovery/requests.json"))
        .and(query_param("filter[has-users][]", user_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": Uuid::new_v4().to_string(), "status": "pending" },
            { "id": Uuid::new_v4().to_string(), "status": "completed" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dtos = client_for(&server)
        .await
        .find_requests_by_user(user_id)
        .await
        .unwrap();

    assert_eq!(dtos.len(), 2);
}

#[tokio::test]
async fn save_review_posts_the_draft_and_returns_the_echo() {
    let server = MockServer::start().await;
    let request_id = Uuid::new_v4();
    let assigned_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/account-recovery/responses.json"))
        .and(body_partial_json(json!({
            "account_recovery_request_id": request_id.to_string(),
            "responder_foreign_model": FOREIGN_MODEL_ORGANIZATION_KEY,
            "status": "rejected",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": assigned_id.to_string(),
            "account_recovery_request_id": request_id.to_string(),
            "responder_foreign_key": Uuid::new_v4().to_string(),
            "responder_foreign_model": FOREIGN_MODEL_ORGANIZATION_KEY,
            "status": "rejected",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = AccountRecoveryResponseDto {
        account_recovery_request_id: Some(request_id.to_string()),
        responder_foreign_key: Some(Uuid::new_v4().to_string()),
        responder_foreign_model: Some(FOREIGN_MODEL_ORGANIZATION_KEY.to_string()),
        status: Some("rejected".to_string()),
        ..Default::default()
    };
    let confirmed = client_for(&server).await.save_review(&draft).await.unwrap();

    assert_eq!(confirmed.id, Some(assigned_id.to_string()));
}

#[tokio::test]
async fn save_review_conflict_maps_to_conflict_error() {
    let server = MockServer::start().await;
    let request_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/account-recovery/responses.json"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let draft = AccountRecoveryResponseDto {
        account_recovery_request_id: Some(request_id.to_string()),
        status: Some("approved".to_string()),
        ..Default::default()
    };
    let err = client_for(&server).await.save_review(&draft).await.unwrap_err();

    let RecoveryError::Conflict(conflicted) = err else {
        panic!("expected conflict error");
    };
    assert_eq!(conflicted, request_id.to_string());
}
