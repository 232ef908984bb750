//! OpenPGP envelope layer for Keyhaven.
//!
//! Wraps rPGP with the three primitives the recovery protocol needs:
//!
//! 1. **Key unlock**: parse an armored private key and validate its
//!    passphrase up front, yielding a [`KeyHandle`] usable for the rest of
//!    a call chain.
//! 2. **Decrypt-and-verify**: open a ciphertext *and* require a valid
//!    signature from one specific expected signer. A message that decrypts
//!    but is signed by anyone else (or not at all) is rejected outright —
//!    the relay storing these messages is untrusted.
//! 3. **Encrypt-and-sign**: the reverse direction, producing an armored
//!    message readable only by the recipient and attributable to the signer.
//!
//! Nothing in this crate knows about recovery requests; it is a generic
//! envelope service consumed through the [`EnvelopeService`] trait so
//! callers can substitute instrumented fakes in tests.

mod envelope;
mod error;
mod keys;

pub use envelope::{EnvelopeService, PgpEnvelopeService};
pub use error::{PgpError, PgpResult};
pub use keys::{
    fingerprint_hex, generate_key_pair, read_public_key, read_secret_key, GeneratedKeyPair,
    KeyHandle,
};
