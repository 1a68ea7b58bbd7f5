//! Hash functions.
//!
//! - [`hash`]: SHA-512
//! - [`short_hash`]: SipHash-2-4, keyed, for hash tables and short digests
//! - [`generic_hash`] / [`generic_hash_keyed`]: BLAKE2b-256

use std::hash::Hasher;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2bMac};
use sha2::Sha512;
use siphasher::sip::SipHasher24;
use zeroize::Zeroizing;

use keycask_common::{ensure_size, Error, Result};

/// SHA-512 digest size (64 bytes).
pub const BYTES: usize = 64;

/// SipHash key size (16 bytes).
pub const SHORTHASH_KEYBYTES: usize = 16;

/// SipHash output size (8 bytes).
pub const SHORTHASH_BYTES: usize = 8;

/// BLAKE2b output size (32 bytes).
pub const GENERICHASH_BYTES: usize = 32;

/// BLAKE2b key size (32 bytes).
pub const GENERICHASH_KEYBYTES: usize = 32;

/// SHA-512 digest of `message`.
pub fn hash(message: &[u8]) -> Vec<u8> {
    use sha2::Digest;

    Sha512::digest(message).to_vec()
}

/// SipHash-2-4 of `message` under `key`, little-endian.
///
/// # Errors
/// - `SizeMismatch` if `key` is not `SHORTHASH_KEYBYTES` long
pub fn short_hash(message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(key.len(), SHORTHASH_KEYBYTES, "key", "hash::short_hash")?;

    let mut k = Zeroizing::new([0u8; SHORTHASH_KEYBYTES]);
    k.copy_from_slice(key);

    let mut hasher = SipHasher24::new_with_key(&k);
    hasher.write(message);
    Ok(hasher.finish().to_le_bytes().to_vec())
}

/// Unkeyed BLAKE2b-256 digest of `message`.
pub fn generic_hash(message: &[u8]) -> Vec<u8> {
    use blake2::Digest;

    let mut hasher = Blake2b::<U32>::new();
    hasher.update(message);
    hasher.finalize().to_vec()
}

/// Keyed BLAKE2b-256 digest of `message`.
///
/// # Errors
/// - `SizeMismatch` if `key` is not `GENERICHASH_KEYBYTES` long
pub fn generic_hash_keyed(message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    use blake2::digest::Mac;

    ensure_size(key.len(), GENERICHASH_KEYBYTES, "key", "hash::generic_hash_keyed")?;

    let mut mac = <Blake2bMac<U32> as Mac>::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("BLAKE2b key rejected: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
