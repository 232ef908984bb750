//! Escrowed passphrase ciphertexts attached to a recovery request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldErrors, ModelResult};
use crate::validate::{optional_uuid, require_armored, require_fingerprint};
use crate::PGP_MESSAGE_PREFIX;

/// Wire shape of a private key password.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecoveryPrivateKeyPasswordDto {
    pub id: Option<String>,
    pub private_key_id: Option<String>,
    pub recipient_foreign_model: Option<String>,
    pub recipient_foreign_key: Option<String>,
    pub recipient_fingerprint: Option<String>,
    pub data: Option<String>,
}

/// One escrowed-passphrase ciphertext, addressed to a specific recovery key.
///
/// A request carries one of these per currently-valid organization recovery
/// key, so reviews keep working across key rotations. The `data` plaintext is
/// the passphrase protecting the requesting user's real vault key, encrypted
/// to `recipient_fingerprint`'s key and signed by the request's escrow key.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountRecoveryPrivateKeyPassword {
    id: Option<Uuid>,
    private_key_id: Option<Uuid>,
    recipient_foreign_model: Option<String>,
    recipient_foreign_key: Option<Uuid>,
    recipient_fingerprint: String,
    data: String,
}

impl AccountRecoveryPrivateKeyPassword {
    /// Validates a DTO, reporting every broken field at once.
    pub fn from_dto(dto: AccountRecoveryPrivateKeyPasswordDto) -> ModelResult<Self> {
        let (entity, errors) = Self::validate(dto);
        errors.into_result()?;
        Ok(entity.expect("validated"))
    }

    /// Shared with the request entity, which aggregates nested errors.
    pub(crate) fn validate(
        dto: AccountRecoveryPrivateKeyPasswordDto,
    ) -> (Option<Self>, FieldErrors) {
        let mut errors = FieldErrors::new();
        let id = optional_uuid(&mut errors, "id", dto.id.as_deref());
        let private_key_id = optional_uuid(&mut errors, "private_key_id", dto.private_key_id.as_deref());
        let recipient_foreign_key =
            optional_uuid(&mut errors, "recipient_foreign_key", dto.recipient_foreign_key.as_deref());
        let recipient_fingerprint = require_fingerprint(
            &mut errors,
            "recipient_fingerprint",
            dto.recipient_fingerprint.as_deref(),
        );
        let data = require_armored(&mut errors, "data", dto.data.as_deref(), PGP_MESSAGE_PREFIX);

        if !errors.is_empty() {
            return (None, errors);
        }
        let entity = Self {
            id,
            private_key_id,
            recipient_foreign_model: dto.recipient_foreign_model,
            recipient_foreign_key,
            recipient_fingerprint: recipient_fingerprint.expect("validated"),
            data: data.expect("validated"),
        };
        (Some(entity), errors)
    }

    pub fn to_dto(&self) -> AccountRecoveryPrivateKeyPasswordDto {
        AccountRecoveryPrivateKeyPasswordDto {
            id: self.id.map(|id| id.to_string()),
            private_key_id: self.private_key_id.map(|id| id.to_string()),
            recipient_foreign_model: self.recipient_foreign_model.clone(),
            recipient_foreign_key: self.recipient_foreign_key.map(|id| id.to_string()),
            recipient_fingerprint: Some(self.recipient_fingerprint.clone()),
            data: Some(self.data.clone()),
        }
    }

    pub fn recipient_fingerprint(&self) -> &str {
        &self.recipient_fingerprint
    }

    /// Armored encrypted+signed message whose plaintext is the escrowed
    /// vault-key passphrase.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// The private key passwords embedded in one recovery request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountRecoveryPrivateKeyPasswordsCollection {
    items: Vec<AccountRecoveryPrivateKeyPassword>,
}

impl AccountRecoveryPrivateKeyPasswordsCollection {
    pub(crate) fn new(items: Vec<AccountRecoveryPrivateKeyPassword>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountRecoveryPrivateKeyPassword> {
        self.items.iter()
    }

    /// First entry addressed to `fingerprint`.
    ///
    /// First-match policy: active recovery keys are expected to have unique
    /// fingerprints, so duplicates are not resolved here.
    pub fn first_by_fingerprint(&self, fingerprint: &str) -> Option<&AccountRecoveryPrivateKeyPassword> {
        self.items
            .iter()
            .find(|item| item.recipient_fingerprint == fingerprint)
    }
}
