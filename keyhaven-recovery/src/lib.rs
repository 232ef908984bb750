//! Account recovery protocol client.
//!
//! The server is a blind relay: it stores and forwards ciphertexts between a
//! requesting user and a human reviewer, but never holds a key capable of
//! reading them. This crate implements the reviewer side:
//!
//! - [`RecoveryApiClient`]: REST gateway for fetching requests and posting
//!   responses.
//! - [`ReviewController`]: the approve/reject algorithm — unlock the
//!   reviewer's recovery key, locate the escrowed passphrase addressed to it,
//!   decrypt it while verifying it was signed by the request's own escrow
//!   key, re-encrypt it to that escrow key, and submit the response.
//! - [`RequestFinder`]: thin read accessors.
//! - [`RecoveryClient`]: facade wiring the production services together.
//!
//! Each call is one self-contained pipeline over injected services; no
//! mutable state is shared across calls, so concurrent reviews of different
//! requests are safe. Nothing is retried: every step before the final POST
//! is side-effect free, and the POST itself is the single point of no
//! return.

pub mod api_client;
pub mod client;
pub mod config;
pub mod error;
pub mod finder;
pub mod gateway;
pub mod review;

pub use api_client::RecoveryApiClient;
pub use client::RecoveryClient;
pub use config::GatewayConfig;
pub use error::{RecoveryError, RecoveryResult};
pub use finder::RequestFinder;
pub use gateway::{AccountRecoveryGateway, RequestProjection};
pub use review::{ReviewController, ReviewerKey, NO_PRIVATE_KEY_PASSWORD_FOUND};
