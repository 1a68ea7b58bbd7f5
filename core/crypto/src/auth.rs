//! Secret-key message authentication using HMAC-SHA-512-256.
//!
//! The tag is the first 32 bytes of HMAC-SHA-512.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use tracing::debug;

use keycask_common::{ensure_size, Error, Result};

/// Key size (32 bytes).
pub const KEYBYTES: usize = 32;

/// Authenticator size (32 bytes).
pub const BYTES: usize = 32;

type HmacSha512 = Hmac<Sha512>;

fn compute(message: &[u8], key: &[u8]) -> Result<[u8; BYTES]> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("HMAC key rejected: {}", e)))?;
    mac.update(message);

    let full = mac.finalize().into_bytes();
    let mut tag = [0u8; BYTES];
    tag.copy_from_slice(&full[..BYTES]);
    Ok(tag)
}

/// Compute the authenticator of `message` under `key`.
///
/// # Errors
/// - `SizeMismatch` if `key` is not `KEYBYTES` long
pub fn authenticate(message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(key.len(), KEYBYTES, "key", "auth::authenticate")?;
    Ok(compute(message, key)?.to_vec())
}

/// Check `tag` against `message` and `key` in constant time.
///
/// # Errors
/// - `SizeMismatch` if `key` or `tag` has the wrong length
/// - `VerificationFailed` if the tag does not match
pub fn verify(tag: &[u8], message: &[u8], key: &[u8]) -> Result<()> {
    ensure_size(key.len(), KEYBYTES, "key", "auth::verify")?;
    ensure_size(tag.len(), BYTES, "authenticator", "auth::verify")?;

    let expected = compute(message, key)?;
    if bool::from(expected[..].ct_eq(tag)) {
        return Ok(());
    }
    debug!(operation = "auth::verify", "invalid authenticator");
    Err(Error::VerificationFailed {
        operation: "auth::verify",
    })
}
