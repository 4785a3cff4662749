//! Error types for `ssh-pq-sig`.

use thiserror::Error;

/// Errors produced by the SSH signature adapter.
///
/// Every variant is returned synchronously to the immediate caller. Nothing
/// in this crate retries or logs a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SshSigError {
    /// Missing key material, an empty signature blob, or a primitive-level
    /// failure while signing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A buffer or primitive instance could not be obtained.
    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    /// Malformed signature blob: truncated field, embedded NUL, trailing
    /// bytes, or a signature field larger than the algorithm allows.
    #[error("invalid signature format: {0}")]
    InvalidFormat(String),

    /// The blob's `"ssh-"` prefix or algorithm token does not match the
    /// algorithm being verified.
    #[error("key type mismatch: expected {expected:?}, found {found:?}")]
    KeyTypeMismatch {
        /// Token the verifying binding expects.
        expected: String,
        /// Token found in the blob (lossy UTF-8).
        found: String,
    },

    /// Cryptographic verification rejected the signature.
    ///
    /// Carries no detail: a malformed signature, a wrong key and a tampered
    /// message are indistinguishable to the caller.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// No algorithm is registered under the given name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Signer configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}
