//! Read accessors for recovery requests. No crypto, no business rules.

use std::sync::Arc;

use keyhaven_model::{
    AccountRecoveryRequest, AccountRecoveryRequestsCollection, FieldErrors, ModelError,
};
use uuid::Uuid;

use crate::error::{RecoveryError, RecoveryResult};
use crate::gateway::{AccountRecoveryGateway, RequestProjection};

/// Thin finders over the gateway.
pub struct RequestFinder {
    gateway: Arc<dyn AccountRecoveryGateway>,
}

impl RequestFinder {
    pub fn new(gateway: Arc<dyn AccountRecoveryGateway>) -> Self {
        Self { gateway }
    }

    /// Fetches one request by id, embedding its creator.
    pub async fn get_request(&self, request_id: &str) -> RecoveryResult<AccountRecoveryRequest> {
        let id = parse_uuid_argument("request_id", request_id)?;
        let dto = self
            .gateway
            .find_request(id, RequestProjection::with_creator())
            .await?;
        Ok(AccountRecoveryRequest::from_dto(dto)?)
    }

    /// Fetches all requests created by a user.
    pub async fn get_user_requests(
        &self,
        user_id: &str,
    ) -> RecoveryResult<AccountRecoveryRequestsCollection> {
        let id = parse_uuid_argument("user_id", user_id)?;
        let dtos = self.gateway.find_requests_by_user(id).await?;
        Ok(AccountRecoveryRequestsCollection::from_dtos(dtos)?)
    }
}

fn parse_uuid_argument(name: &str, raw: &str) -> RecoveryResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        let mut errors = FieldErrors::new();
        errors.add(name, "must be a valid uuid");
        RecoveryError::Validation(ModelError::Validation(errors))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_uuid_is_a_validation_error() {
        let err = parse_uuid_argument("request_id", "not-a-uuid").unwrap_err();
        assert!(matches!(err, RecoveryError::Validation(_)));
    }
}
