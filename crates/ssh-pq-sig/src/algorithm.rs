//! Algorithm dispatch table.
//!
//! Each supported SSH key type is one [`AlgorithmBinding`]: the token that
//! appears in the signature blob plus the provider algorithm that backs it.
//! The set is fixed at build time; [`BINDINGS`] lists it in
//! [`Algorithm::ALL`] order.

use crate::error::SshSigError;
use crate::provider::ProviderAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Prefix of every SSH key type name and first field of every signature blob.
pub const SSH_PREFIX: &str = "ssh-";

/// Immutable pairing of a provider algorithm with its SSH wire token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlgorithmBinding {
    /// Which primitive to request from the provider.
    pub provider_alg: ProviderAlgorithm,
    /// Exact ASCII token embedded in the signature blob.
    pub wire_name: &'static str,
}

const OQS_DEFAULT: AlgorithmBinding = AlgorithmBinding {
    provider_alg: ProviderAlgorithm::Default,
    wire_name: "oqsdefault",
};

const DILITHIUM_2: AlgorithmBinding = AlgorithmBinding {
    provider_alg: ProviderAlgorithm::Dilithium2,
    wire_name: "dilithium2",
};

const DILITHIUM_3: AlgorithmBinding = AlgorithmBinding {
    provider_alg: ProviderAlgorithm::Dilithium3,
    wire_name: "dilithium3",
};

const DILITHIUM_5: AlgorithmBinding = AlgorithmBinding {
    provider_alg: ProviderAlgorithm::Dilithium5,
    wire_name: "dilithium5",
};

/// Every binding, in [`Algorithm::ALL`] order.
pub static BINDINGS: [AlgorithmBinding; 4] = [OQS_DEFAULT, DILITHIUM_2, DILITHIUM_3, DILITHIUM_5];

// ---------------------------------------------------------------------------
// Algorithm selector
// ---------------------------------------------------------------------------

/// Caller-facing algorithm selector.
///
/// Serializes as its wire token (`"dilithium3"`), which is also what
/// [`fmt::Display`] prints and [`FromStr`] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// The provider's configurable default scheme.
    #[serde(rename = "oqsdefault")]
    OqsDefault,
    /// Dilithium, parameter set 2.
    #[serde(rename = "dilithium2")]
    Dilithium2,
    /// Dilithium, parameter set 3.
    #[serde(rename = "dilithium3")]
    Dilithium3,
    /// Dilithium, parameter set 5.
    #[serde(rename = "dilithium5")]
    Dilithium5,
}

impl Algorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 4] = [
        Self::OqsDefault,
        Self::Dilithium2,
        Self::Dilithium3,
        Self::Dilithium5,
    ];

    /// The binding for this algorithm.
    #[must_use]
    pub const fn binding(self) -> &'static AlgorithmBinding {
        match self {
            Self::OqsDefault => &OQS_DEFAULT,
            Self::Dilithium2 => &DILITHIUM_2,
            Self::Dilithium3 => &DILITHIUM_3,
            Self::Dilithium5 => &DILITHIUM_5,
        }
    }

    /// Wire token, e.g. `"dilithium2"`.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        self.binding().wire_name
    }

    /// SSH key type name, e.g. `"ssh-dilithium2"`, as used in
    /// `HostKeyAlgorithms` and `PubkeyAcceptedKeyTypes`.
    #[must_use]
    pub const fn ssh_key_type(self) -> &'static str {
        match self {
            Self::OqsDefault => "ssh-oqsdefault",
            Self::Dilithium2 => "ssh-dilithium2",
            Self::Dilithium3 => "ssh-dilithium3",
            Self::Dilithium5 => "ssh-dilithium5",
        }
    }

    /// Provider algorithm backing this selector.
    #[must_use]
    pub const fn provider_alg(self) -> ProviderAlgorithm {
        self.binding().provider_alg
    }

    /// Look up an algorithm by wire token (`dilithium2`) or SSH key type
    /// name (`ssh-dilithium2`). Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::UnknownAlgorithm`] if nothing matches.
    pub fn from_name(name: &str) -> Result<Self, SshSigError> {
        let token = name.strip_prefix(SSH_PREFIX).unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|alg| alg.wire_name() == token)
            .ok_or_else(|| SshSigError::UnknownAlgorithm(name.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Algorithm {
    type Err = SshSigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
