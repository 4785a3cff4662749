//! ML-DSA signature provider backed by `libcrux-ml-dsa`.
//!
//! This module provides:
//! - [`LibcruxProvider`] — a [`SignatureProvider`] for every [`ProviderAlgorithm`]
//! - [`MlDsaPrimitive`] — one ML-DSA parameter set behind [`SignaturePrimitive`]
//! - [`LibcruxProvider::generate_keypair`] — key pairs for the SSH key types
//!
//! # Parameter Mapping
//!
//! | Provider algorithm | Parameter set |
//! |--------------------|---------------|
//! | `Dilithium2`       | ML-DSA-44     |
//! | `Dilithium3`       | ML-DSA-65     |
//! | `Dilithium5`       | ML-DSA-87     |
//! | `Default`          | configured, ML-DSA-44 unless overridden |
//!
//! Signing uses 32 bytes of fresh OS randomness per signature and an empty
//! context string.
//!
//! # Interoperability
//!
//! The `dilithium2`/`dilithium3`/`dilithium5` wire tokens are backed by
//! FIPS 204 ML-DSA, not by round-3 Dilithium. The two are not
//! signature-compatible: blobs from a peer that signs round-3 Dilithium under
//! the same tokens frame correctly but fail verification with
//! [`SshSigError::SignatureInvalid`], and the reverse holds for the peer.

use crate::algorithm::Algorithm;
use crate::config::SignerConfig;
use crate::error::SshSigError;
use crate::key::SshPqKey;
use crate::memory::{SecretBuffer, SecretBytes};
use crate::provider::{PrimitiveError, ProviderAlgorithm, SignaturePrimitive, SignatureProvider};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// ML-DSA-44 verification key length in bytes (FIPS 204).
pub const ML_DSA_44_VERIFICATION_KEY_LEN: usize = 1312;
/// ML-DSA-44 signing key length in bytes (FIPS 204).
pub const ML_DSA_44_SIGNING_KEY_LEN: usize = 2560;
/// ML-DSA-44 signature length in bytes (FIPS 204).
pub const ML_DSA_44_SIGNATURE_LEN: usize = 2420;

/// ML-DSA-65 verification key length in bytes (FIPS 204).
pub const ML_DSA_65_VERIFICATION_KEY_LEN: usize = 1952;
/// ML-DSA-65 signing key length in bytes (FIPS 204).
pub const ML_DSA_65_SIGNING_KEY_LEN: usize = 4032;
/// ML-DSA-65 signature length in bytes (FIPS 204).
pub const ML_DSA_65_SIGNATURE_LEN: usize = 3309;

/// ML-DSA-87 verification key length in bytes (FIPS 204).
pub const ML_DSA_87_VERIFICATION_KEY_LEN: usize = 2592;
/// ML-DSA-87 signing key length in bytes (FIPS 204).
pub const ML_DSA_87_SIGNING_KEY_LEN: usize = 4896;
/// ML-DSA-87 signature length in bytes (FIPS 204).
pub const ML_DSA_87_SIGNATURE_LEN: usize = 4627;

/// Key generation seed size (32 bytes).
pub const ML_DSA_KEYGEN_SEED_LEN: usize = 32;

/// Signing randomness size (32 bytes).
const ML_DSA_SIGN_RAND_LEN: usize = 32;

/// ML-DSA context string. SSH signatures carry no domain separator.
const ML_DSA_CONTEXT: &[u8] = b"";

// ---------------------------------------------------------------------------
// Parameter sets
// ---------------------------------------------------------------------------

/// ML-DSA parameter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MlDsaLevel {
    /// ML-DSA-44 (NIST category 2).
    #[default]
    #[serde(rename = "ml-dsa-44")]
    MlDsa44,
    /// ML-DSA-65 (NIST category 3).
    #[serde(rename = "ml-dsa-65")]
    MlDsa65,
    /// ML-DSA-87 (NIST category 5).
    #[serde(rename = "ml-dsa-87")]
    MlDsa87,
}

impl MlDsaLevel {
    /// Signature length in bytes.
    #[must_use]
    pub const fn signature_len(self) -> usize {
        match self {
            Self::MlDsa44 => ML_DSA_44_SIGNATURE_LEN,
            Self::MlDsa65 => ML_DSA_65_SIGNATURE_LEN,
            Self::MlDsa87 => ML_DSA_87_SIGNATURE_LEN,
        }
    }

    /// Signing (secret) key length in bytes.
    #[must_use]
    pub const fn signing_key_len(self) -> usize {
        match self {
            Self::MlDsa44 => ML_DSA_44_SIGNING_KEY_LEN,
            Self::MlDsa65 => ML_DSA_65_SIGNING_KEY_LEN,
            Self::MlDsa87 => ML_DSA_87_SIGNING_KEY_LEN,
        }
    }

    /// Verification (public) key length in bytes.
    #[must_use]
    pub const fn verification_key_len(self) -> usize {
        match self {
            Self::MlDsa44 => ML_DSA_44_VERIFICATION_KEY_LEN,
            Self::MlDsa65 => ML_DSA_65_VERIFICATION_KEY_LEN,
            Self::MlDsa87 => ML_DSA_87_VERIFICATION_KEY_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// libcrux glue
// ---------------------------------------------------------------------------

// The three parameter sets expose identical APIs under different module and
// type names, so each operation is written once and stamped out per module.

macro_rules! ml_dsa_sign {
    ($module:ident, $sk:ident, $secret_key:expr, $message:expr, $rand:expr, $out:expr) => {{
        let available = $out.len();
        // SAFETY NOTE: libcrux key types do not implement `Zeroize`; this
        // stack copy of the signing key is not wiped. The authoritative copy
        // stays in the caller's `SecretBuffer`.
        let sk = libcrux_ml_dsa::$module::$sk::new($secret_key.try_into().map_err(|_| {
            PrimitiveError::InvalidKey(format!(
                "signing key is {} bytes, wrong length for {}",
                $secret_key.len(),
                stringify!($module)
            ))
        })?);
        // SAFETY NOTE: libcrux takes the signing randomness by value; that
        // argument copy is not zeroized. The caller's `SecretBytes` is.
        let sig = libcrux_ml_dsa::$module::sign(&sk, $message, ML_DSA_CONTEXT, *$rand)
            .map_err(|e| PrimitiveError::Signing(format!("{e:?}")))?;
        let bytes: &[u8] = sig.as_ref();
        let dst = $out
            .get_mut(..bytes.len())
            .ok_or(PrimitiveError::BufferTooSmall {
                needed: bytes.len(),
                available,
            })?;
        dst.copy_from_slice(bytes);
        bytes.len()
    }};
}

macro_rules! ml_dsa_verify {
    ($module:ident, $vk:ident, $sig:ident, $public_key:expr, $message:expr, $signature:expr) => {{
        let vk = libcrux_ml_dsa::$module::$vk::new($public_key.try_into().map_err(|_| {
            PrimitiveError::InvalidKey(format!(
                "verification key is {} bytes, wrong length for {}",
                $public_key.len(),
                stringify!($module)
            ))
        })?);
        let sig = libcrux_ml_dsa::$module::$sig::new(
            $signature
                .try_into()
                .map_err(|_| PrimitiveError::Rejected)?,
        );
        libcrux_ml_dsa::$module::verify(&vk, $message, ML_DSA_CONTEXT, &sig)
            .map_err(|_| PrimitiveError::Rejected)
    }};
}

macro_rules! ml_dsa_keygen {
    ($module:ident, $seed:expr) => {{
        let kp = libcrux_ml_dsa::$module::generate_key_pair($seed);
        // SAFETY NOTE: `kp.signing_key` is not zeroized after this copy (no
        // `Zeroize` impl upstream). The returned `SecretBuffer` is the copy
        // that is kept.
        let secret = SecretBuffer::new(kp.signing_key.as_slice())?;
        let public = kp.verification_key.as_ref().to_vec();
        (secret, public)
    }};
}

// ---------------------------------------------------------------------------
// Primitive
// ---------------------------------------------------------------------------

/// One ML-DSA parameter set, acquired per call from [`LibcruxProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MlDsaPrimitive {
    level: MlDsaLevel,
}

impl MlDsaPrimitive {
    /// Primitive for `level`.
    #[must_use]
    pub const fn new(level: MlDsaLevel) -> Self {
        Self { level }
    }

    /// Parameter set of this primitive.
    #[must_use]
    pub const fn level(&self) -> MlDsaLevel {
        self.level
    }

    fn sign_with_randomness(
        self,
        message: &[u8],
        secret_key: &[u8],
        sign_rand: &[u8; ML_DSA_SIGN_RAND_LEN],
        out: &mut [u8],
    ) -> Result<usize, PrimitiveError> {
        let written = match self.level {
            MlDsaLevel::MlDsa44 => {
                ml_dsa_sign!(ml_dsa_44, MLDSA44SigningKey, secret_key, message, sign_rand, out)
            }
            MlDsaLevel::MlDsa65 => {
                ml_dsa_sign!(ml_dsa_65, MLDSA65SigningKey, secret_key, message, sign_rand, out)
            }
            MlDsaLevel::MlDsa87 => {
                ml_dsa_sign!(ml_dsa_87, MLDSA87SigningKey, secret_key, message, sign_rand, out)
            }
        };
        Ok(written)
    }
}

impl SignaturePrimitive for MlDsaPrimitive {
    fn max_signature_len(&self) -> usize {
        self.level.signature_len()
    }

    fn sign(
        &self,
        message: &[u8],
        secret_key: &[u8],
        out: &mut [u8],
    ) -> Result<usize, PrimitiveError> {
        let randomness = SecretBytes::<ML_DSA_SIGN_RAND_LEN>::random()
            .map_err(|e| PrimitiveError::Signing(e.to_string()))?;
        self.sign_with_randomness(message, secret_key, randomness.expose(), out)
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), PrimitiveError> {
        match self.level {
            MlDsaLevel::MlDsa44 => ml_dsa_verify!(
                ml_dsa_44,
                MLDSA44VerificationKey,
                MLDSA44Signature,
                public_key,
                message,
                signature
            ),
            MlDsaLevel::MlDsa65 => ml_dsa_verify!(
                ml_dsa_65,
                MLDSA65VerificationKey,
                MLDSA65Signature,
                public_key,
                message,
                signature
            ),
            MlDsaLevel::MlDsa87 => ml_dsa_verify!(
                ml_dsa_87,
                MLDSA87VerificationKey,
                MLDSA87Signature,
                public_key,
                message,
                signature
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// [`SignatureProvider`] handing out [`MlDsaPrimitive`]s.
///
/// Holds only the choice of default parameter set, so it is `Copy` and can
/// be shared freely between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LibcruxProvider {
    default_level: MlDsaLevel,
}

impl LibcruxProvider {
    /// Provider whose `Default` algorithm is `default_level`.
    #[must_use]
    pub const fn new(default_level: MlDsaLevel) -> Self {
        Self { default_level }
    }

    /// Provider configured from a [`SignerConfig`].
    #[must_use]
    pub const fn from_config(config: &SignerConfig) -> Self {
        Self::new(config.default_scheme)
    }

    /// Parameter set backing `algorithm`.
    #[must_use]
    pub const fn level_for(&self, algorithm: ProviderAlgorithm) -> MlDsaLevel {
        match algorithm {
            ProviderAlgorithm::Default => self.default_level,
            ProviderAlgorithm::Dilithium2 => MlDsaLevel::MlDsa44,
            ProviderAlgorithm::Dilithium3 => MlDsaLevel::MlDsa65,
            ProviderAlgorithm::Dilithium5 => MlDsaLevel::MlDsa87,
        }
    }

    /// Generate a fresh key pair for `algorithm` from OS randomness.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the seed or the secret
    /// buffer cannot be obtained.
    pub fn generate_keypair(&self, algorithm: Algorithm) -> Result<SshPqKey, SshSigError> {
        let seed = SecretBytes::<ML_DSA_KEYGEN_SEED_LEN>::random()?;
        self.generate_keypair_from_seed(algorithm, *seed.expose())
    }

    /// Derive a key pair for `algorithm` deterministically from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the secret buffer
    /// cannot be allocated.
    pub fn generate_keypair_from_seed(
        &self,
        algorithm: Algorithm,
        seed: [u8; ML_DSA_KEYGEN_SEED_LEN],
    ) -> Result<SshPqKey, SshSigError> {
        let (secret, public) = match self.level_for(algorithm.provider_alg()) {
            MlDsaLevel::MlDsa44 => ml_dsa_keygen!(ml_dsa_44, seed),
            MlDsaLevel::MlDsa65 => ml_dsa_keygen!(ml_dsa_65, seed),
            MlDsaLevel::MlDsa87 => ml_dsa_keygen!(ml_dsa_87, seed),
        };
        Ok(SshPqKey::from_secret_buffer(algorithm, secret, public))
    }
}

impl SignatureProvider for LibcruxProvider {
    type Primitive = MlDsaPrimitive;

    fn acquire(&self, algorithm: ProviderAlgorithm) -> Result<MlDsaPrimitive, PrimitiveError> {
        let level = self.level_for(algorithm);
        tracing::trace!(?algorithm, ?level, "acquired ML-DSA primitive");
        Ok(MlDsaPrimitive::new(level))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
