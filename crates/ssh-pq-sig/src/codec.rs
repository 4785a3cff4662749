//! SSH signature blob encoding and strict decoding.
//!
//! This module provides:
//! - [`encode_signature`] — frame a raw signature as an SSH signature blob
//! - [`decode_signature`] — validate a blob and return the raw signature
//! - [`SignatureBlob`] — owned, encoded blob
//!
//! # Blob Layout
//!
//! ```text
//! string "ssh-" | string <wire name> | string <raw signature>
//! ```
//!
//! Each `string` carries a u32 big-endian length prefix. Nothing here is
//! algorithm-specific: the wire name is whatever the caller's binding says.

use crate::algorithm::SSH_PREFIX;
use crate::error::SshSigError;
use crate::wire::{WireReader, WireWriter, LEN_PREFIX};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Encoded SSH signature blob.
///
/// Produced by [`encode_signature`] and consumed by [`decode_signature`].
#[must_use = "signature blob must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureBlob(Vec<u8>);

impl SignatureBlob {
    /// Borrow the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the blob holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SignatureBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<SignatureBlob> for Vec<u8> {
    fn from(blob: SignatureBlob) -> Self {
        blob.0
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Frame `raw_signature` as `string "ssh-" | string wire_name | string raw`.
///
/// # Errors
///
/// Returns [`SshSigError::AllocationFailure`] if the output buffer cannot be
/// reserved or a field is too long for a u32 prefix.
/// Returns [`SshSigError::InvalidArgument`] if `wire_name` contains NUL.
pub fn encode_signature(
    wire_name: &str,
    raw_signature: &[u8],
) -> Result<SignatureBlob, SshSigError> {
    let capacity = [SSH_PREFIX.len(), wire_name.len(), raw_signature.len()]
        .into_iter()
        .try_fold(0usize, |acc, field| {
            acc.checked_add(LEN_PREFIX)?.checked_add(field)
        })
        .ok_or_else(|| SshSigError::AllocationFailure("signature blob size overflow".into()))?;

    let mut w = WireWriter::with_capacity(capacity)?;
    w.put_cstring(SSH_PREFIX)?;
    w.put_cstring(wire_name)?;
    w.put_string(raw_signature)?;

    debug_assert_eq!(w.len(), capacity);
    Ok(SignatureBlob(w.into_bytes()))
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Parse a signature blob and return a borrowed view of the raw signature.
///
/// All three fields are read before anything is compared, so a truncated
/// blob is a format error even when its prefix is also wrong.
///
/// # Errors
///
/// - [`SshSigError::InvalidFormat`] — truncated or over-long field, NUL in a
///   text field, or bytes left over after the third field.
/// - [`SshSigError::KeyTypeMismatch`] — first field is not `"ssh-"` or the
///   second is not exactly `expected_wire_name`.
pub fn decode_signature<'a>(
    blob: &'a [u8],
    expected_wire_name: &str,
) -> Result<&'a [u8], SshSigError> {
    let mut r = WireReader::new(blob);
    let prefix = r.get_cstring()?;
    let wire_name = r.get_cstring()?;
    let raw_signature = r.get_string()?;

    if prefix != SSH_PREFIX.as_bytes() {
        return Err(mismatch(SSH_PREFIX, prefix));
    }
    if wire_name != expected_wire_name.as_bytes() {
        return Err(mismatch(expected_wire_name, wire_name));
    }

    if !r.is_empty() {
        return Err(SshSigError::InvalidFormat(format!(
            "unexpected trailing data: {} bytes after signature",
            r.remaining()
        )));
    }

    Ok(raw_signature)
}

fn mismatch(expected: &str, found: &[u8]) -> SshSigError {
    SshSigError::KeyTypeMismatch {
        expected: expected.to_string(),
        found: String::from_utf8_lossy(found).into_owned(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
