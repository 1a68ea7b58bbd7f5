//! Secret-key authenticated encryption using XSalsa20-Poly1305.
//!
//! Ciphertexts are `tag || encrypted message`, i.e. `MACBYTES` longer than
//! the message. The key and nonce must be exactly `KEYBYTES` and
//! `NONCEBYTES` long.

use keycask_common::{ensure_size, Result};

use crate::nacl;

/// Key size (32 bytes).
pub const KEYBYTES: usize = 32;

/// Nonce size (24 bytes).
pub const NONCEBYTES: usize = 24;

/// Authentication tag size (16 bytes).
pub const MACBYTES: usize = nacl::MACBYTES;

/// Leading zero bytes of the padded NaCl message layout.
pub const ZEROBYTES: usize = nacl::ZEROBYTES;

/// Leading zero bytes of the padded NaCl ciphertext layout.
pub const BOXZEROBYTES: usize = nacl::BOXZEROBYTES;

/// Encrypt and authenticate `message`.
///
/// # Preconditions
/// - `nonce` must be unique for each message sealed under `key`
///
/// # Errors
/// - `SizeMismatch` if `key` or `nonce` has the wrong length
pub fn seal(message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(key.len(), KEYBYTES, "key", "secretbox::seal")?;
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "secretbox::seal")?;
    nacl::seal(message, nonce, key)
}

/// Verify and decrypt `ciphertext`.
///
/// # Errors
/// - `SizeMismatch` if `key` or `nonce` has the wrong length
/// - `CiphertextTooShort` if `ciphertext` cannot hold a tag
/// - `VerificationFailed` if the ciphertext was forged or tampered with
pub fn open(ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_size(key.len(), KEYBYTES, "key", "secretbox::open")?;
    ensure_size(nonce.len(), NONCEBYTES, "nonce", "secretbox::open")?;
    nacl::open(ciphertext, nonce, key, "secretbox::open")
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycask_common::Error;
    use proptest::prelude::*;

    const KEY: [u8; KEYBYTES] = [42u8; KEYBYTES];
    const NONCE: [u8; NONCEBYTES] = [7u8; NONCEBYTES];

    #[test]
    fn test_seal_open_roundtrip() {
        let sealed = seal(b"Hello, World!", &NONCE, &KEY).unwrap();
        assert_eq!(sealed.len(), MACBYTES + 13);
        assert_eq!(open(&sealed, &NONCE, &KEY).unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_empty_message() {
        let sealed = seal(b"", &NONCE, &KEY).unwrap();
        assert_eq!(sealed.len(), MACBYTES);
        assert!(open(&sealed, &NONCE, &KEY).unwrap().is_empty());
    }

    #[test]
    fn test_deterministic_for_same_nonce() {
        let ct1 = seal(b"same", &NONCE, &KEY).unwrap();
        let ct2 = seal(b"same", &NONCE, &KEY).unwrap();
        assert_eq!(ct1, ct2);

        let ct3 = seal(b"same", &[8u8; NONCEBYTES], &KEY).unwrap();
        assert_ne!(ct1, ct3);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(b"Secret data", &NONCE, &KEY).unwrap();
        let err = open(&sealed, &NONCE, &[1u8; KEYBYTES]).unwrap_err();
        assert!(err.is_verification_failure());
    }

    #[test]
    fn test_truncated_ciphertext() {
        let err = open(&[0u8; 10], &NONCE, &KEY).unwrap_err();
        assert!(matches!(err, Error::CiphertextTooShort { actual: 10, .. }));
    }

    #[test]
    fn test_invalid_key_length() {
        match seal(b"data", &NONCE, &[0u8; 16]) {
            Err(Error::SizeMismatch {
                actual,
                expected,
                operation,
                ..
            }) => {
                assert_eq!(actual, 16);
                assert_eq!(expected, KEYBYTES);
                assert_eq!(operation, "secretbox::seal");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_nonce_length() {
        let err = open(&[0u8; 32], &[0u8; 12], &KEY).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                actual: 12,
                expected: NONCEBYTES,
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(message in proptest::collection::vec(any::<u8>(), 0..512)) {
            let sealed = seal(&message, &NONCE, &KEY).unwrap();
            prop_assert_eq!(open(&sealed, &NONCE, &KEY).unwrap(), message);
        }

        #[test]
        fn prop_tamper_detected(
            message in proptest::collection::vec(any::<u8>(), 0..128),
            index in any::<proptest::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut sealed = seal(&message, &NONCE, &KEY).unwrap();
            let i = index.index(sealed.len());
            sealed[i] ^= flip;

            let err = open(&sealed, &NONCE, &KEY).unwrap_err();
            prop_assert!(err.is_verification_failure());
        }
    }
}
