//! The review protocol: approve or reject a recovery request.

use std::sync::Arc;

use keyhaven_model::{
    AccountRecoveryRequest, AccountRecoveryResponse, AccountRecoveryResponseDraft,
    AccountRecoveryResponseDto, FieldErrors, ModelError, ResponseStatus,
};
use keyhaven_pgp::{EnvelopeService, PgpError};
use tracing::{debug, info};

use crate::error::{RecoveryError, RecoveryResult};
use crate::gateway::{AccountRecoveryGateway, RequestProjection};

/// Domain error raised when a request carries no escrowed passphrase at all:
/// the request is malformed or already consumed, and retrying cannot help.
pub const NO_PRIVATE_KEY_PASSWORD_FOUND: &str =
    "No account recovery private key password found.";

/// The reviewer's organization recovery key, as supplied by the UI.
#[derive(Clone)]
pub struct ReviewerKey {
    pub armored_key: String,
    pub passphrase: String,
}

impl std::fmt::Debug for ReviewerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewerKey").finish_non_exhaustive()
    }
}

/// Orchestrates the approve/reject algorithm over injected services.
///
/// Holds no mutable state; one `review` call is one pipeline, and the only
/// side effect is the final POST. Everything before it can fail and be
/// retried from scratch safely.
pub struct ReviewController {
    gateway: Arc<dyn AccountRecoveryGateway>,
    envelope: Arc<dyn EnvelopeService>,
}

impl ReviewController {
    pub fn new(gateway: Arc<dyn AccountRecoveryGateway>, envelope: Arc<dyn EnvelopeService>) -> Self {
        Self { gateway, envelope }
    }

    /// Reviews a recovery request.
    ///
    /// `draft` must carry `account_recovery_request_id`,
    /// `responder_foreign_key`, `responder_foreign_model` and `status`;
    /// every missing or malformed field is reported in one validation error.
    /// `reviewer_key` is required only for approvals.
    ///
    /// Approvals decrypt the escrowed passphrase addressed to the reviewer's
    /// key, verifying it was signed by the request's own escrow key (the
    /// relay is untrusted — a validly-signed ciphertext from any other party
    /// is rejected), then re-encrypt it to that escrow key signed with the
    /// reviewer's organization key. Rejections perform no crypto at all.
    pub async fn review(
        &self,
        draft: &AccountRecoveryResponseDto,
        reviewer_key: Option<&ReviewerKey>,
    ) -> RecoveryResult<AccountRecoveryResponse> {
        let draft = AccountRecoveryResponseDraft::from_dto(draft)?;
        let request_id = draft.account_recovery_request_id();

        let dto = match draft.status() {
            ResponseStatus::Rejected => {
                debug!(%request_id, "rejecting recovery request");
                draft.into_dto_with_data(None)
            }
            ResponseStatus::Approved => {
                let data = self.build_approval_data(request_id, reviewer_key).await?;
                draft.into_dto_with_data(Some(data))
            }
        };

        let confirmed = self.gateway.save_review(&dto).await?;
        info!(%request_id, "review submitted");
        Ok(AccountRecoveryResponse::from_dto(confirmed)?)
    }

    /// Runs the crypto part of an approval and returns the response payload.
    async fn build_approval_data(
        &self,
        request_id: uuid::Uuid,
        reviewer_key: Option<&ReviewerKey>,
    ) -> RecoveryResult<String> {
        let reviewer_key = reviewer_key.ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("reviewer_key", "is required to approve a request");
            RecoveryError::Validation(ModelError::Validation(errors))
        })?;

        // One generic failure for bad passphrase and unreadable key alike:
        // no oracle for probing stolen key material.
        let reviewer = self
            .envelope
            .decrypt_private_key(&reviewer_key.armored_key, &reviewer_key.passphrase)
            .map_err(|_| RecoveryError::InvalidMasterPassword)?;

        let request_dto = self
            .gateway
            .find_request(request_id, RequestProjection::for_review())
            .await?;
        let request = AccountRecoveryRequest::from_dto(request_dto)?;

        // An association the server did not embed is as terminal as an
        // embedded-but-empty one.
        let passwords = request
            .private_key_passwords()
            .filter(|passwords| !passwords.is_empty())
            .ok_or_else(|| {
                RecoveryError::NotFound(NO_PRIVATE_KEY_PASSWORD_FOUND.to_string())
            })?;

        let escrowed = passwords
            .first_by_fingerprint(reviewer.fingerprint())
            .ok_or_else(|| {
                RecoveryError::NotFound(format!(
                    "no private key password addressed to recovery key {}",
                    reviewer.fingerprint()
                ))
            })?;

        // The escrowed passphrase must have been signed by the same escrow
        // key the request declares; anything else is a substitution.
        let passphrase = self
            .envelope
            .decrypt_and_verify(escrowed.data(), &reviewer, request.armored_key())
            .map_err(map_crypto_error)?;

        debug!(%request_id, "escrowed passphrase verified, re-encrypting to requester");
        self.envelope
            .encrypt_and_sign(&passphrase, request.armored_key(), &reviewer)
            .map_err(map_crypto_error)
    }
}

fn map_crypto_error(err: PgpError) -> RecoveryError {
    match err {
        PgpError::Integrity(message) => RecoveryError::Integrity(message),
        other => RecoveryError::Crypto(other.to_string()),
    }
}
