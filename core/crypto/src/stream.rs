//! XSalsa20 stream cipher.
//!
//! Provides confidentiality only; nothing here authenticates the output.
//! Use [`crate::secretbox`] unless the caller authenticates separately.

use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::XSalsa20;

use keycask_common::{ensure_size, Error, Result};

/// Key size (32 bytes).
pub const KEYBYTES: usize = 32;

/// Nonce size (24 bytes).
pub const NONCEBYTES: usize = 24;

fn apply(buf: &mut [u8], nonce: &[u8], key: &[u8]) -> Result<()> {
    let mut cipher = XSalsa20::new_from_slices(key, nonce)
        .map_err(|e| Error::Crypto(format!("XSalsa20 key or nonce rejected: {}", e)))?;
    cipher.apply_keystream(buf);
    Ok(())
}

/// Generate `len` bytes of keystream.
///
/// # Errors
/// - `SizeMismatch` if `nonce` or `key` has the wrong length
pub fn keystream(len: usize, nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "stream::keystream")?;
    ensure_size(key.len(), KEYBYTES, "key", "stream::keystream")?;

    let mut out = vec![0u8; len];
    apply(&mut out, nonce, key)?;
    Ok(out)
}

/// XOR `message` with the keystream. Encryption and decryption are the same
/// operation.
///
/// # Errors
/// - `SizeMismatch` if `nonce` or `key` has the wrong length
pub fn xor(message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "stream::xor")?;
    ensure_size(key.len(), KEYBYTES, "key", "stream::xor")?;

    let mut out = message.to_vec();
    apply(&mut out, nonce, key)?;
    Ok(out)
}
