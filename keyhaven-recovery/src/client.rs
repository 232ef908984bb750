//! Facade wiring the recovery services together for UI/CLI hosts.

use std::sync::Arc;

use keyhaven_model::{
    AccountRecoveryRequest, AccountRecoveryRequestsCollection, AccountRecoveryResponse,
    AccountRecoveryResponseDto,
};
use keyhaven_pgp::{EnvelopeService, PgpEnvelopeService};

use crate::api_client::RecoveryApiClient;
use crate::config::GatewayConfig;
use crate::error::RecoveryResult;
use crate::finder::RequestFinder;
use crate::gateway::AccountRecoveryGateway;
use crate::review::{ReviewController, ReviewerKey};

/// The interface the recovery core exposes upward.
pub struct RecoveryClient {
    review: ReviewController,
    finder: RequestFinder,
}

impl RecoveryClient {
    /// Production wiring: HTTP gateway plus the rPGP envelope service.
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_services(
            Arc::new(RecoveryApiClient::new(config)),
            Arc::new(PgpEnvelopeService::new()),
        )
    }

    /// Custom wiring, used by tests and embedders.
    pub fn with_services(
        gateway: Arc<dyn AccountRecoveryGateway>,
        envelope: Arc<dyn EnvelopeService>,
    ) -> Self {
        Self {
            review: ReviewController::new(gateway.clone(), envelope),
            finder: RequestFinder::new(gateway),
        }
    }

    /// Reviews a recovery request; see [`ReviewController::review`].
    pub async fn review_request(
        &self,
        draft: &AccountRecoveryResponseDto,
        reviewer_key: Option<&ReviewerKey>,
    ) -> RecoveryResult<AccountRecoveryResponse> {
        self.review.review(draft, reviewer_key).await
    }

    /// Fetches one recovery request by id.
    pub async fn get_request(&self, request_id: &str) -> RecoveryResult<AccountRecoveryRequest> {
        self.finder.get_request(request_id).await
    }

    /// Fetches all recovery requests created by a user.
    pub async fn get_user_requests(
        &self,
        user_id: &str,
    ) -> RecoveryResult<AccountRecoveryRequestsCollection> {
        self.finder.get_user_requests(user_id).await
    }
}
