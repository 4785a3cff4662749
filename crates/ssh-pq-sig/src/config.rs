//! Signer configuration.
//!
//! A small serde struct, read from JSON by the embedding application:
//!
//! ```json
//! { "default_scheme": "ml-dsa-65", "lock_scratch_memory": true }
//! ```
//!
//! Every field is optional; missing fields take the [`Default`] values.

use crate::error::SshSigError;
use crate::libcrux::MlDsaLevel;
use serde::{Deserialize, Serialize};

/// Settings for [`crate::adapter::SshPqSigner`] and
/// [`crate::libcrux::LibcruxProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Parameter set behind the `oqsdefault` key type.
    pub default_scheme: MlDsaLevel,
    /// `mlock` the per-signature scratch buffer (best effort).
    pub lock_scratch_memory: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            default_scheme: MlDsaLevel::default(),
            lock_scratch_memory: true,
        }
    }
}

impl SignerConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::Config`] for malformed JSON, unknown fields or
    /// an unknown scheme name.
    pub fn from_json(json: &str) -> Result<Self, SshSigError> {
        serde_json::from_str(json)
            .map_err(|e| SshSigError::Config(format!("invalid signer configuration: {e}")))
    }

    /// Serialize this configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SshSigError> {
        serde_json::to_string(self)
            .map_err(|e| SshSigError::Config(format!("configuration serialization failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
