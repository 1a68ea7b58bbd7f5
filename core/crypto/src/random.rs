//! Random byte generation from the operating system CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use keycask_common::{Result, SecureBuffer};

/// Fill `buf` with cryptographically secure random bytes.
pub fn fill(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Generate `size` random bytes.
///
/// The result is not locked; use [`random_bytes_locked`] for key material.
pub fn random_bytes(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    fill(&mut buf);
    buf
}

/// Generate `size` random bytes directly in locked memory.
///
/// The buffer is locked before any random byte is written to it.
///
/// # Errors
/// - `MemoryLock` if the buffer cannot be locked
pub fn random_bytes_locked(size: usize) -> Result<SecureBuffer> {
    let mut buf = SecureBuffer::of_size(size)?;
    fill(buf.as_mut_slice());
    debug!(size = buf.len(), "generated locked random buffer");
    Ok(buf)
}
