//! Locked memory buffer for secret bytes.
//!
//! A [`SecureBuffer`] owns a private run of pages that is locked into
//! physical memory (`mlock`/`VirtualLock`) for its whole lifetime and wiped
//! before the pages are unlocked and unmapped.
//!
//! Locking is page-granular, so every non-empty buffer gets its own mapping
//! from [`region::alloc`]. No other allocation ever lives on those pages, and
//! unlocking one buffer cannot unlock another.

use std::fmt;

use region::{Allocation, Protection};
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroize;

use crate::{Error, Result};

/// Owned, fixed-length, memory-locked byte buffer.
///
/// # Invariants
/// - The length never changes after construction (the mapping is never
///   resized or reallocated).
/// - A non-empty buffer is locked for as long as it exists.
/// - The content is overwritten with zeros before the pages are unlocked,
///   on every path that releases them.
///
/// Moving a `SecureBuffer` moves the owning handle only; the locked pages
/// stay where they are. Use [`std::mem::take`] to move out of a place that
/// must stay valid, leaving an empty buffer behind.
pub struct SecureBuffer {
    region: Option<Allocation>,
    len: usize,
    locked: bool,
}

// SAFETY: the mapping is owned exclusively by the buffer and is only reached
// through `&self` or `&mut self`.
unsafe impl Send for SecureBuffer {}
unsafe impl Sync for SecureBuffer {}

impl SecureBuffer {
    /// Take ownership of `bytes`, moving them into locked pages.
    ///
    /// The source allocation is wiped before this returns, on success and
    /// on failure.
    ///
    /// # Errors
    /// - `MemoryLock` if the pages cannot be mapped or locked
    pub fn from_owned(mut bytes: Box<[u8]>) -> Result<Self> {
        let result = Self::from_plain(&bytes);
        bytes.zeroize();
        result
    }

    /// Take ownership of a vector, moving its bytes into locked pages.
    ///
    /// The whole vector allocation, spare capacity included, is wiped.
    pub fn from_vec(mut bytes: Vec<u8>) -> Result<Self> {
        let result = Self::from_plain(&bytes);
        bytes.zeroize();
        result
    }

    /// Copy `bytes` into a newly allocated locked buffer.
    ///
    /// # Postconditions
    /// - The returned buffer is locked and equals `bytes`
    /// - `bytes` is unchanged; wiping it is the caller's responsibility
    pub fn from_plain(bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::of_size(bytes.len())?;
        buffer.as_mut_slice().copy_from_slice(bytes);
        Ok(buffer)
    }

    /// Allocate `size` zero bytes and lock them.
    ///
    /// Typically used as the output region of a primitive that writes
    /// secret material in place.
    pub fn of_size(size: usize) -> Result<Self> {
        if size == 0 {
            return Ok(Self::default());
        }
        let region = region::alloc(size, Protection::READ_WRITE).map_err(|e| {
            warn!(size, error = %e, "failed to map memory");
            Error::MemoryLock(e.to_string())
        })?;
        let mut buffer = Self {
            region: Some(region),
            len: size,
            locked: false,
        };
        // On failure `buffer` is dropped here, which wipes and unmaps it.
        buffer.lock()?;
        Ok(buffer)
    }

    /// Copy this buffer into a new locked buffer.
    pub fn try_clone(&self) -> Result<Self> {
        Self::from_plain(self.as_slice())
    }

    /// Get the bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self.region {
            // SAFETY: the mapping is readable, at least `len` bytes long and
            // lives as long as `self`.
            Some(region) => unsafe {
                std::slice::from_raw_parts(region.as_ptr::<u8>(), self.len)
            },
            None => &[],
        }
    }

    /// Get the bytes for in-place writing.
    ///
    /// The borrow cannot change the length of the buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.region {
            // SAFETY: as in `as_slice`, and the mapping is writable and
            // borrowed exclusively through `&mut self`.
            Some(region) => unsafe {
                std::slice::from_raw_parts_mut(region.as_mut_ptr::<u8>(), self.len)
            },
            None => &mut [],
        }
    }

    /// Get the length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the pages are currently locked into memory.
    ///
    /// Always `false` for an empty buffer, which owns no pages.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Byte at `index`.
    pub fn at(&self, index: usize) -> Result<&u8> {
        let len = self.len();
        self.as_slice().get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Mutable byte at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut u8> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// First byte.
    pub fn front(&self) -> Result<&u8> {
        self.at(0)
    }

    /// Mutable first byte.
    pub fn front_mut(&mut self) -> Result<&mut u8> {
        self.at_mut(0)
    }

    /// Last byte.
    pub fn back(&self) -> Result<&u8> {
        self.at(self.len().wrapping_sub(1))
    }

    /// Mutable last byte.
    pub fn back_mut(&mut self) -> Result<&mut u8> {
        self.at_mut(self.len().wrapping_sub(1))
    }

    fn lock(&mut self) -> Result<()> {
        let Some(region) = &self.region else {
            return Ok(());
        };
        match region::lock(region.as_ptr::<u8>(), region.len()) {
            Ok(guard) => {
                // Unlocking is tied to `wipe_and_unlock`, not to the guard.
                std::mem::forget(guard);
                self.locked = true;
                Ok(())
            }
            Err(e) => {
                warn!(size = self.len, error = %e, "failed to lock memory");
                Err(Error::MemoryLock(e.to_string()))
            }
        }
    }

    /// Overwrite every byte with zero, then unlock the pages.
    ///
    /// Idempotent; the mapping itself is released when the buffer drops.
    fn wipe_and_unlock(&mut self) {
        self.as_mut_slice().zeroize();
        if self.locked {
            if let Some(region) = &self.region {
                if let Err(e) = region::unlock(region.as_ptr::<u8>(), region.len()) {
                    warn!(size = self.len, error = %e, "failed to unlock memory");
                }
            }
            self.locked = false;
        }
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.wipe_and_unlock();
    }
}

impl Default for SecureBuffer {
    fn default() -> Self {
        Self {
            region: None,
            len: 0,
            locked: false,
        }
    }
}

impl AsRef<[u8]> for SecureBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for SecureBuffer {
    fn eq(&self, other: &Self) -> bool {
        // Lengths are public; only the content comparison is constant-time.
        self.len() == other.len() && bool::from(self.as_slice().ct_eq(other.as_slice()))
    }
}

impl Eq for SecureBuffer {}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBuffer([REDACTED; {} bytes])", self.len())
    }
}
