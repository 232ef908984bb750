//! Review response entity, draft, and collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{FieldErrors, ModelError, ModelResult};
use crate::validate::{
    first_duplicate_id, optional_uuid, require_armored, require_parsed, require_uuid,
};
use crate::{FOREIGN_MODEL_ORGANIZATION_KEY, PGP_MESSAGE_PREFIX};

/// Verdict carried by a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Approved,
    Rejected,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

/// Wire shape of a response, both for the POST body (no id) and the
/// server-confirmed echo (id and timestamps assigned).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecoveryResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_recovery_request_id: Option<String>,
    pub responder_foreign_key: Option<String>,
    pub responder_foreign_model: Option<String>,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

/// Caller-supplied review verdict, validated before any crypto or network
/// work happens.
///
/// All four schema fields are checked in one pass so a form can render every
/// problem at once.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountRecoveryResponseDraft {
    account_recovery_request_id: Uuid,
    responder_foreign_key: Uuid,
    responder_foreign_model: String,
    status: ResponseStatus,
}

impl AccountRecoveryResponseDraft {
    pub fn from_dto(dto: &AccountRecoveryResponseDto) -> ModelResult<Self> {
        let mut errors = FieldErrors::new();

        let request_id = require_uuid(
            &mut errors,
            "account_recovery_request_id",
            dto.account_recovery_request_id.as_deref(),
        );
        let responder_foreign_key = require_uuid(
            &mut errors,
            "responder_foreign_key",
            dto.responder_foreign_key.as_deref(),
        );
        let responder_foreign_model = match dto.responder_foreign_model.as_deref() {
            None => {
                errors.add("responder_foreign_model", "is required");
                None
            }
            Some(FOREIGN_MODEL_ORGANIZATION_KEY) => {
                Some(FOREIGN_MODEL_ORGANIZATION_KEY.to_string())
            }
            Some(_) => {
                errors.add(
                    "responder_foreign_model",
                    format!("must be \"{FOREIGN_MODEL_ORGANIZATION_KEY}\""),
                );
                None
            }
        };
        let status = require_parsed::<ResponseStatus>(
            &mut errors,
            "status",
            dto.status.as_deref(),
            "approved, rejected",
        );

        errors.into_result()?;
        Ok(Self {
            account_recovery_request_id: request_id.expect("validated"),
            responder_foreign_key: responder_foreign_key.expect("validated"),
            responder_foreign_model: responder_foreign_model.expect("validated"),
            status: status.expect("validated"),
        })
    }

    pub fn account_recovery_request_id(&self) -> Uuid {
        self.account_recovery_request_id
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Assembles the POST body: the draft fields plus the re-encrypted
    /// payload for approvals. Server-side fields stay unset.
    pub fn into_dto_with_data(self, data: Option<String>) -> AccountRecoveryResponseDto {
        AccountRecoveryResponseDto {
            id: None,
            account_recovery_request_id: Some(self.account_recovery_request_id.to_string()),
            responder_foreign_key: Some(self.responder_foreign_key.to_string()),
            responder_foreign_model: Some(self.responder_foreign_model),
            status: Some(self.status.as_str().to_string()),
            data,
            created: None,
            modified: None,
            created_by: None,
            modified_by: None,
        }
    }
}

/// A reviewer's verdict on one request, as confirmed by the server.
///
/// Created exactly once per request; there is no update operation.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountRecoveryResponse {
    id: Option<Uuid>,
    account_recovery_request_id: Uuid,
    responder_foreign_key: Uuid,
    responder_foreign_model: String,
    status: ResponseStatus,
    data: Option<String>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    created_by: Option<Uuid>,
    modified_by: Option<Uuid>,
}

impl AccountRecoveryResponse {
    /// Validates a DTO, reporting every broken field at once. Enforces the
    /// payload rule: `data` present on approvals, absent on rejections.
    pub fn from_dto(dto: AccountRecoveryResponseDto) -> ModelResult<Self> {
        let mut errors = FieldErrors::new();

        let id = optional_uuid(&mut errors, "id", dto.id.as_deref());
        let request_id = require_uuid(
            &mut errors,
            "account_recovery_request_id",
            dto.account_recovery_request_id.as_deref(),
        );
        let responder_foreign_key = require_uuid(
            &mut errors,
            "responder_foreign_key",
            dto.responder_foreign_key.as_deref(),
        );
        if dto.responder_foreign_model.is_none() {
            errors.add("responder_foreign_model", "is required");
        }
        let status = require_parsed::<ResponseStatus>(
            &mut errors,
            "status",
            dto.status.as_deref(),
            "approved, rejected",
        );
        let created_by = optional_uuid(&mut errors, "created_by", dto.created_by.as_deref());
        let modified_by = optional_uuid(&mut errors, "modified_by", dto.modified_by.as_deref());

        let data = match (status, dto.data.as_deref()) {
            (Some(ResponseStatus::Approved), raw) => {
                require_armored(&mut errors, "data", raw, PGP_MESSAGE_PREFIX)
            }
            (Some(ResponseStatus::Rejected), Some(_)) => {
                errors.add("data", "must be absent on a rejected response");
                None
            }
            _ => None,
        };

        errors.into_result()?;
        Ok(Self {
            id,
            account_recovery_request_id: request_id.expect("validated"),
            responder_foreign_key: responder_foreign_key.expect("validated"),
            responder_foreign_model: dto.responder_foreign_model.expect("validated"),
            status: status.expect("validated"),
            data,
            created: dto.created,
            modified: dto.modified,
            created_by,
            modified_by,
        })
    }

    pub fn to_dto(&self) -> AccountRecoveryResponseDto {
        AccountRecoveryResponseDto {
            id: self.id.map(|id| id.to_string()),
            account_recovery_request_id: Some(self.account_recovery_request_id.to_string()),
            responder_foreign_key: Some(self.responder_foreign_key.to_string()),
            responder_foreign_model: Some(self.responder_foreign_model.clone()),
            status: Some(self.status.as_str().to_string()),
            data: self.data.clone(),
            created: self.created,
            modified: self.modified,
            created_by: self.created_by.map(|id| id.to_string()),
            modified_by: self.modified_by.map(|id| id.to_string()),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn account_recovery_request_id(&self) -> Uuid {
        self.account_recovery_request_id
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Armored payload re-encrypted to the requester's escrow key; present
    /// only on approvals.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// Responses fetched for a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountRecoveryResponsesCollection {
    items: Vec<AccountRecoveryResponse>,
}

impl AccountRecoveryResponsesCollection {
    /// Builds the collection, failing atomically on the first duplicate id
    /// before any entity is exposed.
    pub fn from_dtos(dtos: Vec<AccountRecoveryResponseDto>) -> ModelResult<Self> {
        if let Some(id) = first_duplicate_id(dtos.iter().map(|d| d.id.as_deref())) {
            return Err(ModelError::DuplicateId(id));
        }
        let items = dtos
            .into_iter()
            .map(AccountRecoveryResponse::from_dto)
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { items })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountRecoveryResponse> {
        self.items.iter()
    }
}

/// Opt-in normalization mirroring [`sanitize_request_dtos`]: drops repeated
/// ids, keeps the first occurrence, idempotent.
///
/// [`sanitize_request_dtos`]: crate::sanitize_request_dtos
pub fn sanitize_response_dtos(
    dtos: Vec<AccountRecoveryResponseDto>,
) -> Vec<AccountRecoveryResponseDto> {
    let mut seen = std::collections::HashSet::new();
    dtos.into_iter()
        .filter(|dto| match &dto.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}
