//! `ssh-pq-sig` — post-quantum signature algorithms as SSH public-key types.
//!
//! Wraps sign/verify primitives into the SSH signature blob
//! (`string "ssh-" | string <wire name> | string <signature>`) and validates
//! that framing strictly on verification.
//!
//! No network, no async, no global state. The only concrete primitive
//! provider is [`LibcruxProvider`] (ML-DSA via `libcrux-ml-dsa`); any other
//! can be injected through [`SignatureProvider`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;
pub mod wire;

pub mod codec;

pub mod algorithm;
pub mod key;
pub mod provider;

pub mod libcrux;

pub mod adapter;

pub mod config;

pub use adapter::{sign, sign_with_scratch_policy, verify, SshPqSigner};
pub use algorithm::{Algorithm, AlgorithmBinding, BINDINGS, SSH_PREFIX};
pub use codec::{decode_signature, encode_signature, SignatureBlob};
pub use config::SignerConfig;
pub use error::SshSigError;
pub use key::{KeyMaterial, SshPqKey};
pub use libcrux::{LibcruxProvider, MlDsaLevel, MlDsaPrimitive};
pub use memory::{LockedRegion, ScratchBuffer, SecretBuffer, SecretBytes};
pub use provider::{PrimitiveError, ProviderAlgorithm, SignaturePrimitive, SignatureProvider};
pub use wire::{WireReader, WireWriter};
