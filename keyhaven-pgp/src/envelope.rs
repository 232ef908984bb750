//! Encrypt-sign / decrypt-verify envelope primitives.

use pgp::composed::{Deserializable, Message};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::KeyTrait;
use rand::thread_rng;
use tracing::warn;

use crate::error::{PgpError, PgpResult};
use crate::keys::{fingerprint_hex, read_public_key, read_secret_key, KeyHandle};

/// The envelope operations the recovery protocol depends on.
///
/// Controllers hold this as a trait object so tests can substitute
/// instrumented fakes (e.g. to prove a code path performs zero crypto).
pub trait EnvelopeService: Send + Sync {
    /// Parses an armored private key and validates its passphrase.
    fn decrypt_private_key(&self, armored_key: &str, passphrase: &str) -> PgpResult<KeyHandle>;

    /// Decrypts `armored_message` with `recipient` and requires a valid
    /// signature from `expected_signer_public_key`.
    ///
    /// A message that decrypts but carries no signature, or a signature by
    /// any other key, fails with [`PgpError::Integrity`]. The relay storing
    /// these messages is untrusted, so "decrypted but unverified" is never
    /// an acceptable outcome.
    fn decrypt_and_verify(
        &self,
        armored_message: &str,
        recipient: &KeyHandle,
        expected_signer_public_key: &str,
    ) -> PgpResult<String>;

    /// Encrypts `plaintext` to the recipient's encryption subkey and signs
    /// with the signer's primary key, returning an armored message.
    fn encrypt_and_sign(
        &self,
        plaintext: &str,
        recipient_public_key: &str,
        signer: &KeyHandle,
    ) -> PgpResult<String>;
}

/// Production [`EnvelopeService`] backed by rPGP.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgpEnvelopeService;

impl PgpEnvelopeService {
    pub fn new() -> Self {
        Self
    }
}

impl EnvelopeService for PgpEnvelopeService {
    fn decrypt_private_key(&self, armored_key: &str, passphrase: &str) -> PgpResult<KeyHandle> {
        let key = read_secret_key(armored_key)?;
        KeyHandle::unlock(key, passphrase)
    }

    fn decrypt_and_verify(
        &self,
        armored_message: &str,
        recipient: &KeyHandle,
        expected_signer_public_key: &str,
    ) -> PgpResult<String> {
        let expected_signer = read_public_key(expected_signer_public_key)?;

        let (message, _headers) = Message::from_string(armored_message)
            .map_err(|e| PgpError::Malformed(format!("message: {e}")))?;

        let (decrypted, _key_ids) = message
            .decrypt(|| recipient.passphrase(), &[recipient.secret_key()])
            .map_err(|_| PgpError::Decryption)?;

        let mut inner = decrypted;
        if let Message::Compressed(_) = inner {
            inner = inner
                .decompress()
                .map_err(|e| PgpError::Malformed(format!("compressed message: {e}")))?;
        }

        // The anti-substitution check: the signature must verify against the
        // one expected signer, not merely exist.
        match &inner {
            Message::Signed { .. } => {
                if let Err(e) = inner.verify(&expected_signer) {
                    warn!(
                        expected_signer = %fingerprint_hex(&expected_signer),
                        "rejecting message: signature does not verify against expected signer"
                    );
                    return Err(PgpError::Integrity(e.to_string()));
                }
            }
            _ => {
                warn!("rejecting message: decrypted payload is unsigned");
                return Err(PgpError::Integrity("message is not signed".to_string()));
            }
        }

        let content = inner
            .get_content()
            .map_err(|e| PgpError::Malformed(format!("message content: {e}")))?
            .ok_or_else(|| PgpError::Malformed("message has no literal content".to_string()))?;

        String::from_utf8(content)
            .map_err(|_| PgpError::Malformed("plaintext is not valid UTF-8".to_string()))
    }

    fn encrypt_and_sign(
        &self,
        plaintext: &str,
        recipient_public_key: &str,
        signer: &KeyHandle,
    ) -> PgpResult<String> {
        let recipient = read_public_key(recipient_public_key)?;
        let encryption_key = recipient
            .public_subkeys
            .iter()
            .find(|subkey| subkey.is_encryption_key())
            .ok_or_else(|| PgpError::NoEncryptionKey(fingerprint_hex(&recipient)))?;

        let mut rng = thread_rng();
        let signed = Message::new_literal("", plaintext).sign(
            signer.secret_key(),
            || signer.passphrase(),
            HashAlgorithm::SHA2_256,
        )?;
        let encrypted =
            signed.encrypt_to_keys(&mut rng, SymmetricKeyAlgorithm::AES256, &[encryption_key])?;

        Ok(encrypted.to_armored_string(None)?)
    }
}
