//! X25519 scalar multiplication and key agreement.

use subtle::ConstantTimeEq;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};
use zeroize::Zeroizing;

use keycask_common::{ensure_size, Error, Result, SecureBuffer};

/// Group element (public key / shared point) size (32 bytes).
pub const BYTES: usize = 32;

/// Scalar (secret key) size (32 bytes).
pub const SCALARBYTES: usize = 32;

/// Multiply `point` by `scalar`, writing the result into `out`.
///
/// Sizes are checked by the caller. Fails if the result is the all-zero
/// point, which happens exactly when `point` has small order.
pub(crate) fn multiply_into(out: &mut [u8], scalar: &[u8], point: &[u8]) -> Result<()> {
    let mut k = Zeroizing::new([0u8; SCALARBYTES]);
    k.copy_from_slice(scalar);
    let mut u = [0u8; BYTES];
    u.copy_from_slice(point);

    let q = Zeroizing::new(x25519(*k, u));
    out.copy_from_slice(&q[..]);

    if bool::from(out.ct_eq(&[0u8; BYTES][..])) {
        out.fill(0);
        return Err(Error::InvalidKey("public key is a point of small order"));
    }
    Ok(())
}

/// Multiply the base point by `scalar`.
pub(crate) fn multiply_base_into(out: &mut [u8], scalar: &[u8]) -> Result<()> {
    multiply_into(out, scalar, &X25519_BASEPOINT_BYTES)
}

/// Multiply a group element by a scalar.
///
/// Prefer [`key_agreement`] when the result is used as a secret.
///
/// # Errors
/// - `SizeMismatch` if `scalar` or `point` has the wrong length
/// - `InvalidKey` if `point` has small order
pub fn scalarmult(scalar: &[u8], point: &[u8]) -> Result<Vec<u8>> {
    ensure_size(scalar.len(), SCALARBYTES, "scalar", "scalarmult::scalarmult")?;
    ensure_size(point.len(), BYTES, "element", "scalarmult::scalarmult")?;
    let mut q = vec![0u8; BYTES];
    multiply_into(&mut q, scalar, point)?;
    Ok(q)
}

/// Multiply the standard base point by `scalar`, i.e. derive a public key.
pub fn scalarmult_base(scalar: &[u8]) -> Result<Vec<u8>> {
    ensure_size(scalar.len(), SCALARBYTES, "scalar", "scalarmult::scalarmult_base")?;
    let mut q = vec![0u8; BYTES];
    multiply_base_into(&mut q, scalar)?;
    Ok(q)
}

/// Derive the public key of a locked secret scalar.
pub fn public_from_secret(secret: &SecureBuffer) -> Result<Vec<u8>> {
    ensure_size(secret.len(), SCALARBYTES, "scalar", "scalarmult::public_from_secret")?;
    let mut q = vec![0u8; BYTES];
    multiply_base_into(&mut q, secret.as_slice())?;
    Ok(q)
}

/// Compute the Diffie-Hellman shared secret between `secret` and `public`.
///
/// The result is written straight into locked memory.
///
/// # Errors
/// - `SizeMismatch` if `secret` or `public` has the wrong length
/// - `InvalidKey` if `public` has small order
/// - `MemoryLock` if the output cannot be locked
pub fn key_agreement(secret: &SecureBuffer, public: &[u8]) -> Result<SecureBuffer> {
    ensure_size(secret.len(), SCALARBYTES, "scalar", "scalarmult::key_agreement")?;
    ensure_size(public.len(), BYTES, "element", "scalarmult::key_agreement")?;

    let mut shared = SecureBuffer::of_size(BYTES)?;
    multiply_into(shared.as_mut_slice(), secret.as_slice(), public)?;
    Ok(shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 7748 section 6.1
    const ALICE_SK: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
    const ALICE_PK: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    const BOB_SK: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
    const BOB_PK: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
    const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

    fn bytes(hex: &str) -> Vec<u8> {
        keycask_common::encoding::hex2bin(hex).unwrap()
    }

    #[test]
    fn test_base_matches_rfc7748() {
        assert_eq!(scalarmult_base(&bytes(ALICE_SK)).unwrap(), bytes(ALICE_PK));
        assert_eq!(scalarmult_base(&bytes(BOB_SK)).unwrap(), bytes(BOB_PK));
    }

    #[test]
    fn test_shared_secret_matches_rfc7748() {
        let alice = SecureBuffer::from_plain(&bytes(ALICE_SK)).unwrap();
        let shared = key_agreement(&alice, &bytes(BOB_PK)).unwrap();

        assert!(shared.is_locked());
        assert_eq!(shared.as_slice(), &bytes(SHARED)[..]);
        assert_eq!(scalarmult(&bytes(BOB_SK), &bytes(ALICE_PK)).unwrap(), bytes(SHARED));
    }

    #[test]
    fn test_public_from_secret() {
        let secret = SecureBuffer::from_plain(&bytes(BOB_SK)).unwrap();
        assert_eq!(public_from_secret(&secret).unwrap(), bytes(BOB_PK));
    }

    #[test]
    fn test_small_order_point_rejected() {
        let secret = SecureBuffer::from_plain(&bytes(ALICE_SK)).unwrap();
        let err = key_agreement(&secret, &[0u8; BYTES]).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_invalid_sizes() {
        let short = SecureBuffer::of_size(31).unwrap();
        assert!(matches!(
            key_agreement(&short, &[9u8; BYTES]),
            Err(Error::SizeMismatch {
                actual: 31,
                expected: SCALARBYTES,
                ..
            })
        ));

        let secret = SecureBuffer::of_size(SCALARBYTES).unwrap();
        assert!(matches!(
            key_agreement(&secret, &[9u8; 33]),
            Err(Error::SizeMismatch {
                actual: 33,
                expected: BYTES,
                ..
            })
        ));

        assert!(scalarmult_base(&[1u8; 16]).is_err());
    }
}
