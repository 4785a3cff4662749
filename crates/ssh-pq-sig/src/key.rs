//! Key objects consumed by the sign/verify adapter.
//!
//! The adapter only needs two optional handles from a key: the secret handle
//! for signing and the public handle for verifying. [`KeyMaterial`] is that
//! seam; [`SshPqKey`] is the in-crate implementation.

use crate::algorithm::Algorithm;
use crate::error::SshSigError;
use crate::memory::SecretBuffer;

/// Borrowed view of the key material an SSH key object carries.
///
/// Handles are opaque byte strings sized per algorithm. The adapter borrows
/// them for the duration of one call and never copies the secret handle.
pub trait KeyMaterial {
    /// Secret key bytes, present only on the signing side.
    fn secret_handle(&self) -> Option<&[u8]>;

    /// Public key bytes, required for verification.
    fn public_handle(&self) -> Option<&[u8]>;

    /// Returns `true` if [`KeyMaterial::secret_handle`] is present.
    fn has_secret_handle(&self) -> bool {
        self.secret_handle().is_some()
    }

    /// Returns `true` if [`KeyMaterial::public_handle`] is present.
    fn has_public_handle(&self) -> bool {
        self.public_handle().is_some()
    }
}

/// Post-quantum SSH key: an optional secret handle plus an optional public
/// handle, tagged with the algorithm it belongs to.
///
/// The secret handle lives in a [`SecretBuffer`] (mlocked, zeroized on drop).
/// This type intentionally does NOT implement `Clone` or `Serialize`.
pub struct SshPqKey {
    algorithm: Algorithm,
    secret: Option<SecretBuffer>,
    public: Option<Vec<u8>>,
}

impl SshPqKey {
    /// Build a key from raw handles.
    ///
    /// The secret bytes are copied into secure memory; the caller should
    /// zeroize its own copy afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the secret buffer
    /// cannot be allocated.
    pub fn from_parts(
        algorithm: Algorithm,
        secret: Option<&[u8]>,
        public: Option<Vec<u8>>,
    ) -> Result<Self, SshSigError> {
        let secret = secret.map(SecretBuffer::new).transpose()?;
        Ok(Self {
            algorithm,
            secret,
            public,
        })
    }

    /// Build a verification-only key from its public bytes.
    #[must_use]
    pub const fn from_public(algorithm: Algorithm, public: Vec<u8>) -> Self {
        Self {
            algorithm,
            secret: None,
            public: Some(public),
        }
    }

    pub(crate) const fn from_secret_buffer(
        algorithm: Algorithm,
        secret: SecretBuffer,
        public: Vec<u8>,
    ) -> Self {
        Self {
            algorithm,
            secret: Some(secret),
            public: Some(public),
        }
    }

    /// A copy of this key with the secret handle removed.
    #[must_use]
    pub fn public_only(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            secret: None,
            public: self.public.clone(),
        }
    }

    /// Drop the public handle, keeping only the secret handle.
    #[must_use]
    pub fn without_public(mut self) -> Self {
        self.public = None;
        self
    }

    /// The algorithm this key was created for.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl KeyMaterial for SshPqKey {
    fn secret_handle(&self) -> Option<&[u8]> {
        self.secret.as_ref().map(SecretBuffer::expose)
    }

    fn public_handle(&self) -> Option<&[u8]> {
        self.public.as_deref()
    }
}

impl std::fmt::Debug for SshPqKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshPqKey")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("public_len", &self.public.as_ref().map(Vec::len))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
