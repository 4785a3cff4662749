//! Capability traits for the external signature provider.
//!
//! The adapter never talks to a concrete signature scheme. It asks a
//! [`SignatureProvider`] for a [`SignaturePrimitive`] bound to one
//! [`ProviderAlgorithm`], uses it for a single call, and drops it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider-side algorithm identifier.
///
/// Distinct from the SSH wire token: several wire tokens could map to the
/// same provider algorithm, and the provider decides what `Default` means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderAlgorithm {
    /// The provider's configured default scheme.
    Default,
    /// Lattice scheme, NIST security level 2.
    Dilithium2,
    /// Lattice scheme, NIST security level 3.
    Dilithium3,
    /// Lattice scheme, NIST security level 5.
    Dilithium5,
}

/// Failure reported by a provider or one of its primitives.
///
/// The adapter collapses these into its own error kinds; the detail is only
/// for provider implementers and their tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// The provider has no primitive for this algorithm.
    #[error("algorithm {0:?} is not supported by this provider")]
    Unsupported(ProviderAlgorithm),

    /// Key bytes have the wrong length or structure.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The output buffer is smaller than the signature.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the signature needs.
        needed: usize,
        /// Bytes the caller supplied.
        available: usize,
    },

    /// Signing failed inside the scheme.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The signature does not verify.
    #[error("verification rejected")]
    Rejected,
}

/// One algorithm instance: fixed key formats, bounded signature length.
pub trait SignaturePrimitive {
    /// Largest signature this primitive can produce, in bytes.
    fn max_signature_len(&self) -> usize;

    /// Sign `message` with `secret_key`, writing the raw signature into the
    /// front of `out`. Returns the number of bytes written.
    ///
    /// `out` is at least [`SignaturePrimitive::max_signature_len`] bytes.
    ///
    /// # Errors
    ///
    /// Any [`PrimitiveError`] the scheme reports.
    fn sign(
        &self,
        message: &[u8],
        secret_key: &[u8],
        out: &mut [u8],
    ) -> Result<usize, PrimitiveError>;

    /// Verify `signature` over `message` under `public_key`.
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::Rejected`] for a bad signature; other variants for
    /// malformed inputs.
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), PrimitiveError>;
}

/// Factory for primitive instances.
///
/// Instances are acquired per call and released by dropping them; callers
/// must not cache them across calls.
pub trait SignatureProvider {
    /// Primitive type handed out by this provider.
    type Primitive: SignaturePrimitive;

    /// Construct a primitive for `algorithm`.
    ///
    /// # Errors
    ///
    /// [`PrimitiveError::Unsupported`] if the provider does not offer the
    /// algorithm, or any construction failure.
    fn acquire(&self, algorithm: ProviderAlgorithm) -> Result<Self::Primitive, PrimitiveError>;
}

impl<P: SignatureProvider + ?Sized> SignatureProvider for &P {
    type Primitive = P::Primitive;

    fn acquire(&self, algorithm: ProviderAlgorithm) -> Result<Self::Primitive, PrimitiveError> {
        (**self).acquire(algorithm)
    }
}
