//! Key parsing, unlocking, and generation.

use pgp::composed::{
    Deserializable, KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey,
    SubkeyParamsBuilder,
};
use pgp::types::{KeyTrait, SecretKeyTrait};
use rand::thread_rng;
use zeroize::Zeroizing;

use crate::error::{PgpError, PgpResult};

/// An unlocked private key: parsed, passphrase-validated, ready for
/// decrypt/sign operations.
///
/// The passphrase is kept alongside the key because rPGP stores secret key
/// material encrypted and asks for the passphrase at each operation; it is
/// zeroized on drop. A handle is local to one call chain and never cached.
pub struct KeyHandle {
    key: SignedSecretKey,
    passphrase: Zeroizing<String>,
    fingerprint: String,
}

impl KeyHandle {
    /// Validates the passphrase against the key's encrypted secret material
    /// and returns a handle on success.
    pub fn unlock(key: SignedSecretKey, passphrase: &str) -> PgpResult<Self> {
        key.unlock(|| passphrase.to_string(), |_| Ok(()))
            .map_err(|_| PgpError::InvalidPassphrase)?;

        let fingerprint = fingerprint_hex(&key);
        Ok(Self {
            key,
            passphrase: Zeroizing::new(passphrase.to_string()),
            fingerprint,
        })
    }

    /// Uppercase hex fingerprint of the primary key (40 chars for v4 keys).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub(crate) fn secret_key(&self) -> &SignedSecretKey {
        &self.key
    }

    pub(crate) fn passphrase(&self) -> String {
        self.passphrase.to_string()
    }
}

impl std::fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material or passphrase
        f.debug_struct("KeyHandle")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// A freshly generated key pair, both halves armored.
#[derive(Clone, Debug)]
pub struct GeneratedKeyPair {
    pub armored_secret_key: String,
    pub armored_public_key: String,
    pub fingerprint: String,
}

/// Returns the uppercase hex fingerprint of any key.
pub fn fingerprint_hex(key: &impl KeyTrait) -> String {
    hex::encode_upper(key.fingerprint())
}

/// Parses an ASCII-armored private key block.
pub fn read_secret_key(armored: &str) -> PgpResult<SignedSecretKey> {
    let (key, _headers) = SignedSecretKey::from_string(armored)
        .map_err(|e| PgpError::Malformed(format!("private key: {e}")))?;
    key.verify()
        .map_err(|e| PgpError::Malformed(format!("private key self-signature: {e}")))?;
    Ok(key)
}

/// Parses an ASCII-armored public key block.
pub fn read_public_key(armored: &str) -> PgpResult<SignedPublicKey> {
    let (key, _headers) = SignedPublicKey::from_string(armored)
        .map_err(|e| PgpError::Malformed(format!("public key: {e}")))?;
    key.verify()
        .map_err(|e| PgpError::Malformed(format!("public key self-signature: {e}")))?;
    Ok(key)
}

/// Generates a passphrase-protected key pair: EdDSA primary (sign/certify)
/// with an ECDH encryption subkey.
pub fn generate_key_pair(user_id: &str, passphrase: &str) -> PgpResult<GeneratedKeyPair> {
    let mut rng = thread_rng();

    let params = SecretKeyParamsBuilder::default()
        .key_type(KeyType::EdDSA)
        .can_certify(true)
        .can_sign(true)
        .primary_user_id(user_id.into())
        .passphrase(Some(passphrase.into()))
        .subkey(
            SubkeyParamsBuilder::default()
                .key_type(KeyType::ECDH)
                .can_encrypt(true)
                .passphrase(Some(passphrase.into()))
                .build()
                .map_err(|e| PgpError::Malformed(format!("subkey params: {e}")))?,
        )
        .build()
        .map_err(|e| PgpError::Malformed(format!("key params: {e}")))?;

    let secret_key = params.generate_with_rng(&mut rng)?;
    let signed_secret = secret_key.sign(|| passphrase.to_string())?;

    let public_key = SecretKeyTrait::public_key(&signed_secret);
    let signed_public = public_key.sign(&signed_secret, || passphrase.to_string())?;

    let fingerprint = fingerprint_hex(&signed_secret);
    Ok(GeneratedKeyPair {
        armored_secret_key: signed_secret.to_armored_string(None)?,
        armored_public_key: signed_public.to_armored_string(None)?,
        fingerprint,
    })
}
