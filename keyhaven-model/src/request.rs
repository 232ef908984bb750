//! Recovery request entity and collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{FieldErrors, ModelError, ModelResult};
use crate::private_key_password::{
    AccountRecoveryPrivateKeyPassword, AccountRecoveryPrivateKeyPasswordDto,
    AccountRecoveryPrivateKeyPasswordsCollection,
};
use crate::response::{AccountRecoveryResponse, AccountRecoveryResponseDto};
use crate::validate::{
    first_duplicate_id, optional_fingerprint, optional_uuid, require_armored, require_parsed,
    require_uuid,
};
use crate::PGP_PUBLIC_KEY_PREFIX;

/// Lifecycle of a recovery request.
///
/// Only `pending → {approved, rejected}` happens through this client; the
/// move to `completed` is driven by the requesting user's continue flow and
/// observed here read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Rejected,
    Approved,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Approved => "approved",
            Self::Completed => "completed",
        }
    }

    /// Transitions a reviewer is allowed to trigger.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            _ => Err(()),
        }
    }
}

/// The request creator, as optionally embedded by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDto {
    pub id: Option<String>,
    pub username: Option<String>,
}

/// Snapshot of the organization escrow key the request was created against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecoveryPrivateKeyDto {
    pub id: Option<String>,
    pub data: Option<String>,
}

/// Wire shape of a recovery request, including optional embedded
/// associations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecoveryRequestDto {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub armored_key: Option<String>,
    pub fingerprint: Option<String>,
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub account_recovery_private_key_passwords: Option<Vec<AccountRecoveryPrivateKeyPasswordDto>>,
    pub account_recovery_responses: Option<Vec<AccountRecoveryResponseDto>>,
    pub creator: Option<UserDto>,
    pub account_recovery_private_key: Option<AccountRecoveryPrivateKeyDto>,
}

/// A user's request to recover access to their vault key.
///
/// Server-owned lifecycle: created by enrollment, mutated only through the
/// review submission, never destroyed locally.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountRecoveryRequest {
    id: Uuid,
    user_id: Uuid,
    armored_key: String,
    fingerprint: Option<String>,
    status: RequestStatus,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    created_by: Option<Uuid>,
    modified_by: Option<Uuid>,
    private_key_passwords: Option<AccountRecoveryPrivateKeyPasswordsCollection>,
    responses: Option<Vec<AccountRecoveryResponse>>,
    creator: Option<UserDto>,
    private_key: Option<AccountRecoveryPrivateKeyDto>,
}

impl AccountRecoveryRequest {
    /// Validates a DTO, reporting every broken field at once — including
    /// fields of embedded private key passwords and responses, prefixed by
    /// their association path.
    pub fn from_dto(dto: AccountRecoveryRequestDto) -> ModelResult<Self> {
        let mut errors = FieldErrors::new();

        let id = require_uuid(&mut errors, "id", dto.id.as_deref());
        let user_id = require_uuid(&mut errors, "user_id", dto.user_id.as_deref());
        let armored_key = require_armored(
            &mut errors,
            "armored_key",
            dto.armored_key.as_deref(),
            PGP_PUBLIC_KEY_PREFIX,
        );
        let fingerprint = optional_fingerprint(&mut errors, "fingerprint", dto.fingerprint.as_deref());
        let status = require_parsed::<RequestStatus>(
            &mut errors,
            "status",
            dto.status.as_deref(),
            "pending, rejected, approved, completed",
        );
        let created_by = optional_uuid(&mut errors, "created_by", dto.created_by.as_deref());
        let modified_by = optional_uuid(&mut errors, "modified_by", dto.modified_by.as_deref());

        // Embedded associations keep their presence: an association the
        // server did not embed is None, an embedded-but-empty one is an
        // empty collection.
        let private_key_passwords = dto.account_recovery_private_key_passwords.map(|items| {
            let mut passwords = Vec::new();
            for (index, item) in items.into_iter().enumerate() {
                let (entity, nested) = AccountRecoveryPrivateKeyPassword::validate(item);
                errors.merge_nested(
                    &format!("account_recovery_private_key_passwords.{index}"),
                    nested,
                );
                if let Some(entity) = entity {
                    passwords.push(entity);
                }
            }
            AccountRecoveryPrivateKeyPasswordsCollection::new(passwords)
        });

        let responses = match dto.account_recovery_responses {
            None => None,
            Some(items) => {
                let mut responses = Vec::new();
                for (index, item) in items.into_iter().enumerate() {
                    match AccountRecoveryResponse::from_dto(item) {
                        Ok(entity) => responses.push(entity),
                        Err(ModelError::Validation(nested)) => {
                            errors.merge_nested(
                                &format!("account_recovery_responses.{index}"),
                                nested,
                            );
                        }
                        Err(other) => return Err(other),
                    }
                }
                Some(responses)
            }
        };

        errors.into_result()?;
        Ok(Self {
            id: id.expect("validated"),
            user_id: user_id.expect("validated"),
            armored_key: armored_key.expect("validated"),
            fingerprint,
            status: status.expect("validated"),
            created: dto.created,
            modified: dto.modified,
            created_by,
            modified_by,
            private_key_passwords,
            responses,
            creator: dto.creator,
            private_key: dto.account_recovery_private_key,
        })
    }

    pub fn to_dto(&self) -> AccountRecoveryRequestDto {
        AccountRecoveryRequestDto {
            id: Some(self.id.to_string()),
            user_id: Some(self.user_id.to_string()),
            armored_key: Some(self.armored_key.clone()),
            fingerprint: self.fingerprint.clone(),
            status: Some(self.status.as_str().to_string()),
            created: self.created,
            modified: self.modified,
            created_by: self.created_by.map(|id| id.to_string()),
            modified_by: self.modified_by.map(|id| id.to_string()),
            account_recovery_private_key_passwords: self
                .private_key_passwords
                .as_ref()
                .map(|passwords| passwords.iter().map(|p| p.to_dto()).collect()),
            account_recovery_responses: self
                .responses
                .as_ref()
                .map(|responses| responses.iter().map(|r| r.to_dto()).collect()),
            creator: self.creator.clone(),
            account_recovery_private_key: self.private_key.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The requester's escrow public key, as declared in the request itself.
    /// Review verifies escrowed ciphertexts against this exact key.
    pub fn armored_key(&self) -> &str {
        &self.armored_key
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Embedded escrowed-passphrase ciphertexts; `None` when the server did
    /// not embed the association.
    pub fn private_key_passwords(&self) -> Option<&AccountRecoveryPrivateKeyPasswordsCollection> {
        self.private_key_passwords.as_ref()
    }

    pub fn responses(&self) -> &[AccountRecoveryResponse] {
        self.responses.as_deref().unwrap_or(&[])
    }

    pub fn creator(&self) -> Option<&UserDto> {
        self.creator.as_ref()
    }
}

/// Requests fetched for one user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountRecoveryRequestsCollection {
    items: Vec<AccountRecoveryRequest>,
}

impl AccountRecoveryRequestsCollection {
    /// Builds the collection, failing atomically on the first duplicate id
    /// before any entity is exposed.
    pub fn from_dtos(dtos: Vec<AccountRecoveryRequestDto>) -> ModelResult<Self> {
        if let Some(id) = first_duplicate_id(dtos.iter().map(|d| d.id.as_deref())) {
            return Err(ModelError::DuplicateId(id));
        }
        let items = dtos
            .into_iter()
            .map(AccountRecoveryRequest::from_dto)
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { items })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountRecoveryRequest> {
        self.items.iter()
    }
}

/// Opt-in normalization: drops DTOs whose id repeats an earlier one, keeping
/// the first occurrence. Idempotent; the strict constructor is unchanged for
/// callers who prefer rejection over silent de-duplication.
pub fn sanitize_request_dtos(
    dtos: Vec<AccountRecoveryRequestDto>,
) -> Vec<AccountRecoveryRequestDto> {
    let mut seen = std::collections::HashSet::new();
    dtos.into_iter()
        .filter(|dto| match &dto.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}
