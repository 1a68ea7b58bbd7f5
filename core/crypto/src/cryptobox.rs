//! Public-key authenticated encryption using Curve25519-XSalsa20-Poly1305.
//!
//! A box is a secretbox keyed with HSalsa20 of the X25519 shared point, so
//! both sides derive the same key from their own secret key and the peer's
//! public key. [`precompute`] exposes that key for callers that exchange
//! many messages with the same peer.

use salsa20::cipher::consts::U10;
use salsa20::cipher::generic_array::GenericArray;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use keycask_common::{ensure_size, Result, SecureBuffer};

use crate::{nacl, random, scalarmult};

/// Public key size (32 bytes).
pub const PUBLICKEYBYTES: usize = 32;

/// Secret key size (32 bytes).
pub const SECRETKEYBYTES: usize = 32;

/// Nonce size (24 bytes).
pub const NONCEBYTES: usize = 24;

/// Precomputed shared key size (32 bytes).
pub const BEFORENMBYTES: usize = 32;

/// Authentication tag size (16 bytes).
pub const MACBYTES: usize = nacl::MACBYTES;

/// Leading zero bytes of the padded NaCl message layout.
pub const ZEROBYTES: usize = nacl::ZEROBYTES;

/// Leading zero bytes of the padded NaCl ciphertext layout.
pub const BOXZEROBYTES: usize = nacl::BOXZEROBYTES;

/// Generate a key pair, writing the secret key into `secret`.
///
/// # Preconditions
/// - `secret` must be exactly `SECRETKEYBYTES` long
///
/// # Postconditions
/// - `secret` holds a fresh random secret key
/// - Returns the matching public key
///
/// # Errors
/// - `SizeMismatch` if `secret` has the wrong length
pub fn keypair(secret: &mut SecureBuffer) -> Result<Vec<u8>> {
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "cryptobox::keypair")?;
    random::fill(secret.as_mut_slice());

    let mut public = vec![0u8; PUBLICKEYBYTES];
    scalarmult::multiply_base_into(&mut public, secret.as_slice())?;
    debug!("generated box key pair");
    Ok(public)
}

/// Derive the shared key for `public` and `secret`.
///
/// # Errors
/// - `SizeMismatch` if either key has the wrong length
/// - `InvalidKey` if `public` has small order
pub fn precompute(public: &[u8], secret: &[u8]) -> Result<SecureBuffer> {
    ensure_size(public.len(), PUBLICKEYBYTES, "public key", "cryptobox::precompute")?;
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "cryptobox::precompute")?;
    shared_key(public, secret)
}

fn shared_key(public: &[u8], secret: &[u8]) -> Result<SecureBuffer> {
    let mut point = Zeroizing::new([0u8; scalarmult::BYTES]);
    scalarmult::multiply_into(&mut point[..], secret, public)?;

    let mut key = SecureBuffer::of_size(BEFORENMBYTES)?;
    let mut derived =
        salsa20::hsalsa::<U10>(GenericArray::from_slice(&point[..]), &GenericArray::default());
    key.as_mut_slice().copy_from_slice(&derived);
    derived.as_mut_slice().zeroize();
    Ok(key)
}

/// Encrypt `message` from the holder of `secret` to the holder of `public`.
///
/// # Errors
/// - `SizeMismatch` if `nonce`, `public` or `secret` has the wrong length
/// - `InvalidKey` if `public` has small order
pub fn seal(message: &[u8], nonce: &[u8], public: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "cryptobox::seal")?;
    ensure_size(public.len(), PUBLICKEYBYTES, "public key", "cryptobox::seal")?;
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "cryptobox::seal")?;

    let key = shared_key(public, secret)?;
    nacl::seal(message, nonce, key.as_slice())
}

/// Verify and decrypt a box sent by the holder of `public` to `secret`.
///
/// # Errors
/// - `SizeMismatch` if `nonce`, `public` or `secret` has the wrong length
/// - `CiphertextTooShort` if `ciphertext` cannot hold a tag
/// - `VerificationFailed` if the ciphertext does not authenticate
pub fn open(ciphertext: &[u8], nonce: &[u8], public: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "cryptobox::open")?;
    ensure_size(public.len(), PUBLICKEYBYTES, "public key", "cryptobox::open")?;
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "cryptobox::open")?;

    let key = shared_key(public, secret)?;
    nacl::open(ciphertext, nonce, key.as_slice(), "cryptobox::open")
}

/// Encrypt `message` with a key from [`precompute`].
pub fn seal_precomputed(message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "cryptobox::seal_precomputed")?;
    ensure_size(key.len(), BEFORENMBYTES, "precomputed key", "cryptobox::seal_precomputed")?;
    nacl::seal(message, nonce, key)
}

/// Decrypt `ciphertext` with a key from [`precompute`].
pub fn open_precomputed(ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "cryptobox::open_precomputed")?;
    ensure_size(key.len(), BEFORENMBYTES, "precomputed key", "cryptobox::open_precomputed")?;
    nacl::open(ciphertext, nonce, key, "cryptobox::open_precomputed")
}
