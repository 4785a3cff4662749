//! Generic SSH sign/verify over any [`SignaturePrimitive`].
//!
//! This module provides:
//! - [`sign`] — run the primitive into a scratch buffer, then frame the result
//! - [`verify`] — strictly decode the blob, bound its size, then verify
//! - [`SshPqSigner`] — per-algorithm entry points over a [`SignatureProvider`]
//!
//! # Error Collapsing
//!
//! Every failure of the primitive during verification becomes
//! [`SshSigError::SignatureInvalid`]. A wrong key, a tampered message and a
//! malformed signature body all look the same to the caller. Framing errors
//! are still reported precisely because they are checked before any key
//! material is involved.

use crate::algorithm::{Algorithm, AlgorithmBinding};
use crate::codec::{decode_signature, encode_signature, SignatureBlob};
use crate::config::SignerConfig;
use crate::error::SshSigError;
use crate::key::KeyMaterial;
use crate::libcrux::LibcruxProvider;
use crate::memory::ScratchBuffer;
use crate::provider::{SignaturePrimitive, SignatureProvider};

// ---------------------------------------------------------------------------
// Sign
// ---------------------------------------------------------------------------

/// Sign `message` with `key` and return the framed SSH signature blob.
///
/// The scratch buffer is `mlock`'d; see [`sign_with_scratch_policy`] to
/// choose otherwise.
///
/// # Errors
///
/// - [`SshSigError::InvalidArgument`] — `key` has no secret handle (the
///   primitive is not invoked), or the primitive failed.
/// - [`SshSigError::AllocationFailure`] — scratch or output buffer unavailable.
pub fn sign<P, K>(
    primitive: &P,
    binding: &AlgorithmBinding,
    key: &K,
    message: &[u8],
) -> Result<SignatureBlob, SshSigError>
where
    P: SignaturePrimitive + ?Sized,
    K: KeyMaterial + ?Sized,
{
    sign_with_scratch_policy(primitive, binding, key, message, true)
}

/// [`sign`] with explicit control over `mlock` of the scratch buffer.
///
/// # Errors
///
/// Same as [`sign`].
pub fn sign_with_scratch_policy<P, K>(
    primitive: &P,
    binding: &AlgorithmBinding,
    key: &K,
    message: &[u8],
    lock_scratch: bool,
) -> Result<SignatureBlob, SshSigError>
where
    P: SignaturePrimitive + ?Sized,
    K: KeyMaterial + ?Sized,
{
    let Some(secret) = key.secret_handle() else {
        return Err(SshSigError::InvalidArgument(format!(
            "{} key has no secret handle",
            binding.wire_name
        )));
    };

    let max_len = primitive.max_signature_len();
    // Zeroized on drop, on every return path below.
    let mut scratch = ScratchBuffer::zeroed(max_len, lock_scratch)?;

    // Any primitive failure is reported as an invalid argument.
    let written = primitive
        .sign(message, secret, scratch.as_mut_slice())
        .map_err(|e| {
            SshSigError::InvalidArgument(format!("{} signing failed: {e}", binding.wire_name))
        })?;

    let raw = scratch.prefix(written).ok_or_else(|| {
        SshSigError::InvalidArgument(format!(
            "{} primitive reported {written} bytes for a {max_len}-byte buffer",
            binding.wire_name
        ))
    })?;

    encode_signature(binding.wire_name, raw)
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

/// Verify an SSH signature blob over `message` with `key`.
///
/// # Errors
///
/// - [`SshSigError::InvalidArgument`] — `key` has no public handle or
///   `blob` is empty (the primitive is not invoked).
/// - [`SshSigError::InvalidFormat`] — framing error, trailing data, or a
///   signature field longer than the primitive's maximum.
/// - [`SshSigError::KeyTypeMismatch`] — prefix or wire token mismatch.
/// - [`SshSigError::SignatureInvalid`] — the primitive rejected it, for any
///   reason.
pub fn verify<P, K>(
    primitive: &P,
    binding: &AlgorithmBinding,
    key: &K,
    blob: &[u8],
    message: &[u8],
) -> Result<(), SshSigError>
where
    P: SignaturePrimitive + ?Sized,
    K: KeyMaterial + ?Sized,
{
    let Some(public) = key.public_handle() else {
        return Err(SshSigError::InvalidArgument(format!(
            "{} key has no public handle",
            binding.wire_name
        )));
    };
    if blob.is_empty() {
        return Err(SshSigError::InvalidArgument("empty signature blob".into()));
    }

    let raw = decode_signature(blob, binding.wire_name)?;

    let max_len = primitive.max_signature_len();
    if raw.len() > max_len {
        return Err(SshSigError::InvalidFormat(format!(
            "{} signature is {} bytes, maximum is {max_len}",
            binding.wire_name,
            raw.len()
        )));
    }

    primitive
        .verify(message, raw, public)
        .map_err(|_| SshSigError::SignatureInvalid)
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Per-algorithm sign/verify entry points for the SSH key-type layer.
///
/// Each call looks up the algorithm's binding, acquires a fresh primitive
/// from the provider, runs [`sign`] or [`verify`], and drops the primitive
/// before returning. Nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct SshPqSigner<P> {
    provider: P,
    config: SignerConfig,
}

impl SshPqSigner<LibcruxProvider> {
    /// Signer over [`LibcruxProvider`], configured by `config`.
    #[must_use]
    pub const fn new(config: SignerConfig) -> Self {
        Self {
            provider: LibcruxProvider::from_config(&config),
            config,
        }
    }
}

impl Default for SshPqSigner<LibcruxProvider> {
    fn default() -> Self {
        Self::new(SignerConfig::default())
    }
}

impl<P: SignatureProvider> SshPqSigner<P> {
    /// Signer over an arbitrary provider.
    #[must_use]
    pub const fn with_provider(provider: P, config: SignerConfig) -> Self {
        Self { provider, config }
    }

    /// The injected provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign `message` as `algorithm`.
    ///
    /// # Errors
    ///
    /// [`SshSigError::AllocationFailure`] if the provider cannot supply the
    /// primitive, otherwise as [`sign`].
    pub fn sign<K: KeyMaterial + ?Sized>(
        &self,
        algorithm: Algorithm,
        key: &K,
        message: &[u8],
    ) -> Result<SignatureBlob, SshSigError> {
        let binding = algorithm.binding();
        let primitive = self.acquire(binding)?;
        sign_with_scratch_policy(
            &primitive,
            binding,
            key,
            message,
            self.config.lock_scratch_memory,
        )
    }

    /// Verify `blob` over `message` as `algorithm`.
    ///
    /// # Errors
    ///
    /// [`SshSigError::AllocationFailure`] if the provider cannot supply the
    /// primitive, otherwise as [`verify`].
    pub fn verify<K: KeyMaterial + ?Sized>(
        &self,
        algorithm: Algorithm,
        key: &K,
        blob: &[u8],
        message: &[u8],
    ) -> Result<(), SshSigError> {
        let binding = algorithm.binding();
        let primitive = self.acquire(binding)?;
        verify(&primitive, binding, key, blob, message)
    }

    /// [`SshPqSigner::sign`] with the algorithm given by wire token or SSH
    /// key type name.
    ///
    /// # Errors
    ///
    /// [`SshSigError::UnknownAlgorithm`] for an unregistered name, otherwise
    /// as [`SshPqSigner::sign`].
    pub fn sign_by_name<K: KeyMaterial + ?Sized>(
        &self,
        name: &str,
        key: &K,
        message: &[u8],
    ) -> Result<SignatureBlob, SshSigError> {
        self.sign(Algorithm::from_name(name)?, key, message)
    }

    /// [`SshPqSigner::verify`] with the algorithm given by wire token or SSH
    /// key type name.
    ///
    /// # Errors
    ///
    /// [`SshSigError::UnknownAlgorithm`] for an unregistered name, otherwise
    /// as [`SshPqSigner::verify`].
    pub fn verify_by_name<K: KeyMaterial + ?Sized>(
        &self,
        name: &str,
        key: &K,
        blob: &[u8],
        message: &[u8],
    ) -> Result<(), SshSigError> {
        self.verify(Algorithm::from_name(name)?, key, blob, message)
    }

    fn acquire(&self, binding: &AlgorithmBinding) -> Result<P::Primitive, SshSigError> {
        self.provider.acquire(binding.provider_alg).map_err(|e| {
            SshSigError::AllocationFailure(format!(
                "cannot acquire {} primitive: {e}",
                binding.wire_name
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
