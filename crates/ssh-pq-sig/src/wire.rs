//! SSH wire `string` framing (RFC 4251 §5).
//!
//! This module provides:
//! - [`WireWriter`] — append length-prefixed strings to a growable buffer
//! - [`WireReader`] — read length-prefixed strings as borrowed views
//!
//! Every `string` is a 4-byte big-endian length followed by that many bytes.
//! Lengths above [`MAX_STRING_LEN`] are refused in both directions.

use crate::error::SshSigError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the u32 length prefix in front of every SSH `string`.
pub const LEN_PREFIX: usize = 4;

/// Largest string payload accepted on the wire (128 MiB minus the prefix).
pub const MAX_STRING_LEN: usize = 0x07FF_FFFC;

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Append-only buffer producing SSH wire strings.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create an empty writer with `capacity` bytes reserved up front.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the reservation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, SshSigError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).map_err(|e| {
            SshSigError::AllocationFailure(format!("cannot reserve {capacity} bytes: {e}"))
        })?;
        Ok(Self { buf })
    }

    /// Append `data` as a length-prefixed byte string.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if `data` is longer than
    /// [`MAX_STRING_LEN`] or the buffer cannot grow.
    pub fn put_string(&mut self, data: &[u8]) -> Result<(), SshSigError> {
        if data.len() > MAX_STRING_LEN {
            return Err(SshSigError::AllocationFailure(format!(
                "string of {} bytes exceeds wire maximum {MAX_STRING_LEN}",
                data.len()
            )));
        }
        let len = u32::try_from(data.len())
            .map_err(|_| SshSigError::AllocationFailure("string length exceeds u32".into()))?;
        let needed = data
            .len()
            .checked_add(LEN_PREFIX)
            .ok_or_else(|| SshSigError::AllocationFailure("string size overflow".into()))?;
        self.buf.try_reserve(needed).map_err(|e| {
            SshSigError::AllocationFailure(format!("cannot grow wire buffer: {e}"))
        })?;

        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Append a text token as a length-prefixed string.
    ///
    /// Tokens read back with [`WireReader::get_cstring`] may not contain NUL,
    /// so they are refused here as well.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::InvalidArgument`] if `s` contains a NUL byte,
    /// or any error from [`WireWriter::put_string`].
    pub fn put_cstring(&mut self, s: &str) -> Result<(), SshSigError> {
        if s.as_bytes().contains(&0) {
            return Err(SshSigError::InvalidArgument(
                "wire token contains a NUL byte".into(),
            ));
        }
        self.put_string(s.as_bytes())
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Cursor over a borrowed SSH wire buffer.
///
/// Values are returned as sub-slices of the input; nothing is copied. A
/// failed read leaves the cursor where it was.
#[derive(Debug, Clone, Copy)]
pub struct WireReader<'a> {
    rest: &'a [u8],
}

impl<'a> WireReader<'a> {
    /// Start reading at the beginning of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }

    /// Read one length-prefixed byte string.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::InvalidFormat`] if the prefix is truncated, the
    /// declared length exceeds [`MAX_STRING_LEN`], or the declared length
    /// runs past the end of the buffer.
    pub fn get_string(&mut self) -> Result<&'a [u8], SshSigError> {
        let Some((prefix, body)) = self.rest.split_first_chunk::<LEN_PREFIX>() else {
            return Err(SshSigError::InvalidFormat(format!(
                "truncated length prefix: {} bytes left",
                self.rest.len()
            )));
        };

        let len = usize::try_from(u32::from_be_bytes(*prefix))
            .map_err(|_| SshSigError::InvalidFormat("u32 length exceeds platform usize".into()))?;

        if len > MAX_STRING_LEN {
            return Err(SshSigError::InvalidFormat(format!(
                "declared string length {len} exceeds wire maximum {MAX_STRING_LEN}"
            )));
        }
        if len > body.len() {
            return Err(SshSigError::InvalidFormat(format!(
                "declared string length {len} exceeds remaining {} bytes",
                body.len()
            )));
        }

        let (value, tail) = body.split_at(len);
        self.rest = tail;
        Ok(value)
    }

    /// Read one length-prefixed text token that must not contain NUL.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::InvalidFormat`] for any framing error from
    /// [`WireReader::get_string`] or if the token contains a NUL byte.
    pub fn get_cstring(&mut self) -> Result<&'a [u8], SshSigError> {
        let mut probe = *self;
        let value = probe.get_string()?;
        if value.contains(&0) {
            return Err(SshSigError::InvalidFormat(
                "wire token contains a NUL byte".into(),
            ));
        }
        *self = probe;
        Ok(value)
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
