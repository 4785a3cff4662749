//! Secure memory types for key handles and signature scratch space.
//!
//! This module provides memory-safe wrappers that:
//! - Zero memory on drop via [`zeroize`]
//! - Lock pages in RAM via `mlock` to prevent swap (best effort)
//! - Mask output in `Debug`/`Display` to prevent accidental leakage

use crate::error::SshSigError;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, ExposeSecretMut, SecretSlice};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Platform-specific memory locking
// ---------------------------------------------------------------------------

/// RAII guard that unlocks memory on drop.
///
/// When created, locks a memory region via `mlock` to prevent it from being
/// swapped to disk. On drop, calls `munlock` to release the lock.
///
/// Owners call [`LockedRegion::release`] from their own `Drop`, so the
/// region is unlocked while its bytes are still allocated. Page locks do not
/// nest: unlocking a region also unlocks any other buffer sharing one of its
/// pages.
pub struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: The pointer is only used for mlock/munlock system calls, which
// are thread-safe. The pointed-to data is owned by the buffer that holds
// this guard and is never accessed through LockedRegion.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    /// Attempt to lock a memory region. Returns a guard that unlocks on drop.
    ///
    /// If `mlock` fails (e.g., insufficient privileges or quota), the region
    /// is **not** locked but no error is returned (soft fallback).
    #[must_use]
    pub(crate) fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                tracing::warn!(
                    "mlock failed; secret data may be swapped to disk. \
                     Consider increasing RLIMIT_MEMLOCK."
                );
            });
        }
        Self { ptr, len, locked }
    }

    /// Guard for a region that was deliberately left unlocked.
    pub(crate) const fn unlocked() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
            locked: false,
        }
    }

    /// Returns `true` if the memory region is currently locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Unlock the region now. Later calls, and the guard's own drop, are
    /// no-ops.
    pub(crate) fn release(&mut self) {
        #[cfg(test)]
        unlock_capture::record(self.ptr, self.len);
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
        }
        self.locked = false;
        self.len = 0;
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// SecretBuffer — variable-length key handle
// ---------------------------------------------------------------------------

/// Variable-length buffer for secret key handles.
///
/// Wraps [`SecretSlice<u8>`] from the `secrecy` crate and adds:
/// - `mlock` on allocation (soft fallback if unavailable)
/// - Masked `Debug` output (`SecretBuffer(***)`)
/// - Zeroization on drop (via `secrecy`'s built-in `Zeroize`)
pub struct SecretBuffer {
    lock: LockedRegion,
    inner: SecretSlice<u8>,
}

impl SecretBuffer {
    /// Create a new `SecretBuffer` from the given data.
    ///
    /// The data is copied into a new allocation, then `mlock`'d.
    /// The caller should zeroize the source data after calling this.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if memory allocation fails.
    pub fn new(data: &[u8]) -> Result<Self, SshSigError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(data.len()).map_err(|e| {
            SshSigError::AllocationFailure(format!("secret buffer allocation failed: {e}"))
        })?;
        bytes.extend_from_slice(data);

        let inner: SecretSlice<u8> = bytes.into();
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Ok(Self { lock, inner })
    }

    /// Expose the underlying bytes. Use sparingly: only when the raw
    /// bytes are handed to a signing primitive.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the number of bytes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the underlying memory is `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        self.lock.release();
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

impl fmt::Display for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

// ---------------------------------------------------------------------------
// ScratchBuffer — per-call signature output
// ---------------------------------------------------------------------------

/// Zero-initialised, writable buffer that receives a raw signature before it
/// is framed.
///
/// Owned by exactly one signing call. The contents are zeroized when the
/// buffer is dropped, whichever way the call exits.
pub struct ScratchBuffer {
    lock: LockedRegion,
    inner: SecretSlice<u8>,
}

impl ScratchBuffer {
    /// Allocate `len` zero bytes, optionally `mlock`'d.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the allocation fails.
    pub fn zeroed(len: usize, lock_memory: bool) -> Result<Self, SshSigError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|e| {
            SshSigError::AllocationFailure(format!(
                "scratch buffer of {len} bytes unavailable: {e}"
            ))
        })?;
        bytes.resize(len, 0);

        let inner: SecretSlice<u8> = bytes.into();
        let lock = if lock_memory {
            let exposed = inner.expose_secret();
            LockedRegion::try_lock(exposed.as_ptr(), exposed.len())
        } else {
            LockedRegion::unlocked()
        };
        Ok(Self { lock, inner })
    }

    /// Writable view of the whole buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.inner.expose_secret_mut()
    }

    /// The first `len` bytes, or `None` if `len` exceeds the capacity.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Option<&[u8]> {
        self.inner.expose_secret().get(..len)
    }

    /// Capacity in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns `true` if the buffer has zero capacity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the underlying memory is `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        self.lock.release();
    }
}

impl fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScratchBuffer<{}>(***)", self.len())
    }
}

// ---------------------------------------------------------------------------
// SecretBytes<N> — fixed-size
// ---------------------------------------------------------------------------

/// Fixed-size buffer for seeds and signing randomness.
///
/// Derives `Zeroize` + `ZeroizeOnDrop` so the bytes are securely
/// erased when the value goes out of scope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
    #[zeroize(skip)]
    lock: LockedRegion,
}

impl<const N: usize> SecretBytes<N> {
    /// Create a new `SecretBytes` from a fixed-size array.
    ///
    /// `mlock` targets the address at construction time; after a move the
    /// unlock is a harmless no-op and zeroize-on-drop still applies.
    #[must_use]
    pub fn new(data: [u8; N]) -> Self {
        let mut s = Self {
            bytes: data,
            lock: LockedRegion::unlocked(),
        };
        s.lock = LockedRegion::try_lock(s.bytes.as_ptr(), N);
        s
    }

    /// Create `SecretBytes` filled with cryptographically random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SshSigError::AllocationFailure`] if the CSPRNG fails.
    pub fn random() -> Result<Self, SshSigError> {
        let mut bytes = [0u8; N];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SshSigError::AllocationFailure(format!("CSPRNG fill failed: {e}")))?;
        let s = Self::new(bytes);
        bytes.zeroize();
        Ok(s)
    }

    /// Expose the underlying bytes for cryptographic operations.
    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}


// ---------------------------------------------------------------------------
// Platform-specific implementations
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock is safe to call with any valid pointer/length pair.
        // If the pointer is invalid, the kernel returns ENOMEM which we handle.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: munlock is safe to call. Failure is non-critical.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
