//! HTTP client for the server's account-recovery endpoints.
//!
//! The server is a blind relay; this client only moves DTOs. Wire contract:
//!
//! - `GET  /account-recovery/requests/{id}.json[?contain[...]]`
//! - `GET  /account-recovery/requests.json?filter[has-users][]={userId}`
//! - `POST /account-recovery/responses.json`

use async_trait::async_trait;
use keyhaven_model::{AccountRecoveryRequestDto, AccountRecoveryResponseDto};
use reqwest::{Client, StatusCode};
use tracing::debug;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{RecoveryError, RecoveryResult};
use crate::gateway::{AccountRecoveryGateway, RequestProjection};

/// reqwest-backed [`AccountRecoveryGateway`].
pub struct RecoveryApiClient {
    client: Client,
    config: GatewayConfig,
}

impl RecoveryApiClient {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl AccountRecoveryGateway for RecoveryApiClient {
    async fn find_request(
        &self,
        id: Uuid,
        projection: RequestProjection,
    ) -> RecoveryResult<AccountRecoveryRequestDto> {
        let url = self.url(&format!("/account-recovery/requests/{id}.json"));
        debug!(%id, "fetching account recovery request");

        let resp = self
            .client
            .get(&url)
            .query(&projection.to_query())
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RecoveryError::NotFound(format!(
                "account recovery request {id} not found"
            )));
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| RecoveryError::Api(e.to_string()))?;

        Ok(resp.json().await?)
    }

    async fn find_requests_by_user(
        &self,
        user_id: Uuid,
    ) -> RecoveryResult<Vec<AccountRecoveryRequestDto>> {
        let url = self.url("/account-recovery/requests.json");
        debug!(%user_id, "fetching account recovery requests for user");

        let resp = self
            .client
            .get(&url)
            .query(&[("filter[has-users][]", user_id.to_string())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| RecoveryError::Api(e.to_string()))?;

        Ok(resp.json().await?)
    }

    async fn save_review(
        &self,
        response: &AccountRecoveryResponseDto,
    ) -> RecoveryResult<AccountRecoveryResponseDto> {
        let url = self.url("/account-recovery/responses.json");

        let resp = self.client.post(&url).json(response).send().await?;

        // The server enforces the single pending -> {approved, rejected}
        // transition; a second review loses the race.
        if resp.status() == StatusCode::CONFLICT {
            return Err(RecoveryError::Conflict(
                response
                    .account_recovery_request_id
                    .clone()
                    .unwrap_or_default(),
            ));
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| RecoveryError::Api(e.to_string()))?;

        Ok(resp.json().await?)
    }
}
