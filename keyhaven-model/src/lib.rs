//! Account recovery data model.
//!
//! Entities are constructed from loosely-typed DTOs (everything optional,
//! as it arrives off the wire) and validate **all** fields at once: a failed
//! construction reports every missing or malformed field together, so a form
//! can surface all errors in one pass instead of one at a time.
//!
//! Collections enforce id uniqueness atomically at construction; callers who
//! prefer silent normalization over rejection can run DTOs through the
//! `sanitize_dtos` helpers first.

mod error;
mod private_key_password;
mod request;
mod response;
mod validate;

pub use error::{FieldErrors, ModelError, ModelResult};
pub use private_key_password::{
    AccountRecoveryPrivateKeyPassword, AccountRecoveryPrivateKeyPasswordDto,
    AccountRecoveryPrivateKeyPasswordsCollection,
};
pub use request::{
    sanitize_request_dtos, AccountRecoveryPrivateKeyDto, AccountRecoveryRequest,
    AccountRecoveryRequestDto, AccountRecoveryRequestsCollection, RequestStatus, UserDto,
};
pub use response::{
    sanitize_response_dtos, AccountRecoveryResponse, AccountRecoveryResponseDraft,
    AccountRecoveryResponseDto, AccountRecoveryResponsesCollection, ResponseStatus,
};

/// Armor header line every encrypted payload field must start with.
pub const PGP_MESSAGE_PREFIX: &str = "-----BEGIN PGP MESSAGE-----";

/// Armor header line every public key field must start with.
pub const PGP_PUBLIC_KEY_PREFIX: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";

/// The only recipient/responder foreign model the recovery protocol knows.
pub const FOREIGN_MODEL_ORGANIZATION_KEY: &str = "AccountRecoveryOrganizationKey";
