//! One-time message authentication using Poly1305.
//!
//! A key must never authenticate more than one message.

use poly1305::universal_hash::KeyInit;
use poly1305::Poly1305;
use subtle::ConstantTimeEq;
use tracing::debug;

use keycask_common::{ensure_size, Error, Result};

/// Key size (32 bytes).
pub const KEYBYTES: usize = 32;

/// Authenticator size (16 bytes).
pub const BYTES: usize = 16;

fn compute(message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mac = Poly1305::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("Poly1305 key rejected: {}", e)))?;
    Ok(mac.compute_unpadded(message).to_vec())
}

/// Compute the one-time authenticator of `message`.
pub fn authenticate(message: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(key.len(), KEYBYTES, "key", "onetimeauth::authenticate")?;
    compute(message, key)
}

/// Check `tag` against `message` and `key` in constant time.
pub fn verify(tag: &[u8], message: &[u8], key: &[u8]) -> Result<()> {
    ensure_size(key.len(), KEYBYTES, "key", "onetimeauth::verify")?;
    ensure_size(tag.len(), BYTES, "authenticator", "onetimeauth::verify")?;

    let expected = compute(message, key)?;
    if bool::from(expected.ct_eq(tag)) {
        return Ok(());
    }
    debug!(operation = "onetimeauth::verify", "invalid authenticator");
    Err(Error::VerificationFailed {
        operation: "onetimeauth::verify",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycask_common::encoding::hex2bin;

    #[test]
    fn test_rfc8439_vector() {
        let key = hex2bin("85d6be7857556d337f4452fe42d506a80103808afb0db2fd4abff6af4149f51b")
            .unwrap();
        let tag = authenticate(b"Cryptographic Forum Research Group", &key).unwrap();

        assert_eq!(tag, hex2bin("a8061dc1305136c6c22b8baf0c0127a9").unwrap());
        assert!(verify(&tag, b"Cryptographic Forum Research Group", &key).is_ok());
    }

    #[test]
    fn test_modified_message_fails() {
        let key = [9u8; KEYBYTES];
        let tag = authenticate(b"once", &key).unwrap();
        assert!(verify(&tag, b"twice", &key)
            .unwrap_err()
            .is_verification_failure());
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(authenticate(b"m", &[0u8; 31]).is_err());
        assert!(matches!(
            verify(&[0u8; 32], b"m", &[0u8; KEYBYTES]),
            Err(Error::SizeMismatch {
                actual: 32,
                expected: BYTES,
                ..
            })
        ));
    }
}
