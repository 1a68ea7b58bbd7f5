//! NaCl-layout secretbox.
//!
//! The classic `crypto_secretbox` interface works on padded buffers: the
//! message carries `ZEROBYTES` leading zeros, and the ciphertext comes back
//! with `BOXZEROBYTES` leading zeros followed by the 16-byte tag. The public
//! modules only ever see unpadded messages and `tag || ciphertext`; the
//! padding is applied and removed here.

use crypto_secretbox::aead::{generic_array::GenericArray, AeadInPlace, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use tracing::debug;
use zeroize::Zeroizing;

use keycask_common::{Error, Result};

/// Leading zero bytes required in front of a plaintext.
pub(crate) const ZEROBYTES: usize = 32;

/// Leading zero bytes present in front of a ciphertext.
pub(crate) const BOXZEROBYTES: usize = 16;

/// Authenticator length.
pub(crate) const MACBYTES: usize = ZEROBYTES - BOXZEROBYTES;

/// Raw padded seal.
///
/// `m` must start with `ZEROBYTES` zeros and have the same length as `c`.
/// On return `c` holds `BOXZEROBYTES` zeros, the tag, then the ciphertext.
fn seal_padded(c: &mut [u8], m: &[u8], nonce: &[u8], key: &[u8]) -> Result<()> {
    if m.len() < ZEROBYTES || c.len() != m.len() {
        return Err(Error::Crypto("malformed padded message".to_string()));
    }

    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    c.copy_from_slice(m);
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), b"", &mut c[ZEROBYTES..])
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    c[..BOXZEROBYTES].fill(0);
    c[BOXZEROBYTES..ZEROBYTES].copy_from_slice(&tag);
    Ok(())
}

/// Raw padded open.
///
/// `c` must start with `BOXZEROBYTES` zeros and have the same length as `m`.
/// On success `m` holds `ZEROBYTES` zeros followed by the plaintext. On
/// failure `m` is left zeroed.
fn open_padded(
    m: &mut [u8],
    c: &[u8],
    nonce: &[u8],
    key: &[u8],
    operation: &'static str,
) -> Result<()> {
    if c.len() < ZEROBYTES || m.len() != c.len() {
        return Err(Error::VerificationFailed { operation });
    }

    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    m.copy_from_slice(c);
    let tag = GenericArray::clone_from_slice(&c[BOXZEROBYTES..ZEROBYTES]);
    if cipher
        .decrypt_in_place_detached(GenericArray::from_slice(nonce), b"", &mut m[ZEROBYTES..], &tag)
        .is_err()
    {
        m.fill(0);
        debug!(operation, "ciphertext fails verification");
        return Err(Error::VerificationFailed { operation });
    }

    m[..ZEROBYTES].fill(0);
    Ok(())
}

/// Seal `message`, returning `tag || ciphertext`.
///
/// Sizes of `nonce` and `key` are checked by the caller.
pub(crate) fn seal(message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let len = message.len() + ZEROBYTES;
    let mut mpad = Zeroizing::new(vec![0u8; len]);
    mpad[ZEROBYTES..].copy_from_slice(message);

    let mut cpad = vec![0u8; len];
    seal_padded(&mut cpad, &mpad, nonce, key)?;

    cpad.drain(..BOXZEROBYTES);
    Ok(cpad)
}

/// Open `tag || ciphertext`, returning the plaintext.
///
/// Sizes of `nonce` and `key` are checked by the caller.
pub(crate) fn open(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8],
    operation: &'static str,
) -> Result<Vec<u8>> {
    if ciphertext.len() < MACBYTES {
        return Err(Error::CiphertextTooShort {
            actual: ciphertext.len(),
            minimum: MACBYTES,
            operation,
        });
    }

    let len = ciphertext.len() + BOXZEROBYTES;
    let mut cpad = vec![0u8; len];
    cpad[BOXZEROBYTES..].copy_from_slice(ciphertext);

    let mut mpad = Zeroizing::new(vec![0u8; len]);
    open_padded(&mut mpad, &cpad, nonce, key, operation)?;

    Ok(mpad[ZEROBYTES..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x11; 32];
    const NONCE: [u8; 24] = [0x22; 24];

    #[test]
    fn test_padded_layout() {
        let mut mpad = vec![0u8; ZEROBYTES + 5];
        mpad[ZEROBYTES..].copy_from_slice(b"hello");
        let mut cpad = vec![0xFFu8; mpad.len()];

        seal_padded(&mut cpad, &mpad, &NONCE, &KEY).unwrap();

        assert!(cpad[..BOXZEROBYTES].iter().all(|&b| b == 0));

        let mut out = vec![0xFFu8; cpad.len()];
        open_padded(&mut out, &cpad, &NONCE, &KEY, "test").unwrap();
        assert!(out[..ZEROBYTES].iter().all(|&b| b == 0));
        assert_eq!(&out[ZEROBYTES..], b"hello");
    }

    #[test]
    fn test_seal_strips_box_zero_bytes() {
        let sealed = seal(b"hello", &NONCE, &KEY).unwrap();
        assert_eq!(sealed.len(), MACBYTES + 5);
    }

    #[test]
    fn test_padded_message_too_short() {
        let mpad = [0u8; ZEROBYTES - 1];
        let mut cpad = [0u8; ZEROBYTES - 1];
        assert!(seal_padded(&mut cpad, &mpad, &NONCE, &KEY).is_err());
    }

    #[test]
    fn test_failed_open_leaves_output_zeroed() {
        let mut sealed = seal(b"secret", &NONCE, &KEY).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 1;

        let mut cpad = vec![0u8; sealed.len() + BOXZEROBYTES];
        cpad[BOXZEROBYTES..].copy_from_slice(&sealed);
        let mut out = vec![0xFFu8; cpad.len()];

        let err = open_padded(&mut out, &cpad, &NONCE, &KEY, "test").unwrap_err();
        assert!(err.is_verification_failure());
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_open_too_short() {
        let err = open(&[0u8; MACBYTES - 1], &NONCE, &KEY, "test").unwrap_err();
        assert!(matches!(
            err,
            Error::CiphertextTooShort {
                actual: 15,
                minimum: 16,
                ..
            }
        ));
    }
}
