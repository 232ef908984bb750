//! Gateway abstraction over the server's recovery endpoints.

use async_trait::async_trait;
use keyhaven_model::{AccountRecoveryRequestDto, AccountRecoveryResponseDto};
use uuid::Uuid;

use crate::error::RecoveryResult;

/// Which associations the server should embed when returning a request.
///
/// An explicit, enumerated projection instead of ad hoc "contains" maps:
/// every shape this client ever asks for is nameable and testable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestProjection {
    /// Embed `account_recovery_private_key_passwords[]`.
    pub private_key_passwords: bool,
    /// Embed the `creator` user.
    pub creator: bool,
}

impl RequestProjection {
    /// What the review algorithm needs: the escrowed passphrase ciphertexts.
    pub fn for_review() -> Self {
        Self {
            private_key_passwords: true,
            creator: false,
        }
    }

    /// What a read view needs: who asked.
    pub fn with_creator() -> Self {
        Self {
            private_key_passwords: false,
            creator: true,
        }
    }

    /// Renders the projection as `contain[...]` query parameters.
    pub(crate) fn to_query(self) -> Vec<(&'static str, &'static str)> {
        let mut query = Vec::new();
        if self.private_key_passwords {
            query.push(("contain[account_recovery_private_key_passwords]", "1"));
        }
        if self.creator {
            query.push(("contain[creator]", "1"));
        }
        query
    }
}

/// The server-side operations the recovery protocol relies on.
///
/// Controllers take this as a trait object (injected at construction) so
/// tests can substitute in-memory fakes for the HTTP client.
#[async_trait]
pub trait AccountRecoveryGateway: Send + Sync {
    /// Fetches one recovery request, embedding the requested associations.
    async fn find_request(
        &self,
        id: Uuid,
        projection: RequestProjection,
    ) -> RecoveryResult<AccountRecoveryRequestDto>;

    /// Fetches all recovery requests created by a user.
    async fn find_requests_by_user(
        &self,
        user_id: Uuid,
    ) -> RecoveryResult<Vec<AccountRecoveryRequestDto>>;

    /// Submits a review response. Not idempotent: no client-generated id is
    /// attached, so this is the pipeline's single point of no return.
    async fn save_review(
        &self,
        response: &AccountRecoveryResponseDto,
    ) -> RecoveryResult<AccountRecoveryResponseDto>;
}
