//! Ed25519 signatures.
//!
//! Secret keys are 64 bytes: the 32-byte seed followed by the public key.
//! Combined signed messages are `signature || message`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use tracing::debug;
use zeroize::Zeroizing;

use keycask_common::{ensure_size, Error, Result, SecureBuffer};

use crate::random;

/// Public key size (32 bytes).
pub const PUBLICKEYBYTES: usize = 32;

/// Secret key size (64 bytes).
pub const SECRETKEYBYTES: usize = 64;

/// Seed size (32 bytes).
pub const SEEDBYTES: usize = 32;

/// Signature size (64 bytes).
pub const BYTES: usize = 64;

fn signing_key(secret: &[u8], operation: &'static str) -> Result<SigningKey> {
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", operation)?;
    let keypair: &[u8; SECRETKEYBYTES] = secret
        .try_into()
        .map_err(|_| Error::Crypto("secret key conversion failed".to_string()))?;
    SigningKey::from_keypair_bytes(keypair)
        .map_err(|_| Error::InvalidKey("public half does not match the seed"))
}

fn verifying_key(public: &[u8], operation: &'static str) -> Result<VerifyingKey> {
    ensure_size(public.len(), PUBLICKEYBYTES, "public key", operation)?;
    let bytes: &[u8; PUBLICKEYBYTES] = public
        .try_into()
        .map_err(|_| Error::Crypto("public key conversion failed".to_string()))?;
    VerifyingKey::from_bytes(bytes).map_err(|_| {
        debug!(operation, "public key is not a valid point");
        Error::VerificationFailed { operation }
    })
}

fn write_keypair(key: &SigningKey, secret: &mut SecureBuffer) -> Vec<u8> {
    let keypair = Zeroizing::new(key.to_keypair_bytes());
    secret.as_mut_slice().copy_from_slice(&keypair[..]);
    key.verifying_key().to_bytes().to_vec()
}

/// Generate a key pair, writing the secret key into `secret`.
///
/// # Errors
/// - `SizeMismatch` if `secret` is not `SECRETKEYBYTES` long
/// - `MemoryLock` if the seed cannot be held in locked memory
pub fn keypair(secret: &mut SecureBuffer) -> Result<Vec<u8>> {
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "sign::keypair")?;

    let seed = random::random_bytes_locked(SEEDBYTES)?;
    let public = seed_keypair(seed.as_slice(), secret)?;
    debug!("generated signing key pair");
    Ok(public)
}

/// Derive a key pair deterministically from `seed`.
///
/// # Errors
/// - `SizeMismatch` if `seed` or `secret` has the wrong length
pub fn seed_keypair(seed: &[u8], secret: &mut SecureBuffer) -> Result<Vec<u8>> {
    ensure_size(seed.len(), SEEDBYTES, "seed", "sign::seed_keypair")?;
    ensure_size(secret.len(), SECRETKEYBYTES, "secret key", "sign::seed_keypair")?;

    let seed: &[u8; SEEDBYTES] = seed
        .try_into()
        .map_err(|_| Error::Crypto("seed conversion failed".to_string()))?;
    let key = SigningKey::from_bytes(seed);
    Ok(write_keypair(&key, secret))
}

/// Public key embedded in a secret key.
pub fn public_from_secret(secret: &SecureBuffer) -> Result<Vec<u8>> {
    let key = signing_key(secret.as_slice(), "sign::public_from_secret")?;
    Ok(key.verifying_key().to_bytes().to_vec())
}

/// Sign `message`, returning `signature || message`.
///
/// # Errors
/// - `SizeMismatch` if `secret` is not `SECRETKEYBYTES` long
/// - `InvalidKey` if the secret key is internally inconsistent
pub fn sign(message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let key = signing_key(secret, "sign::sign")?;
    let signature = key.sign(message);

    let mut signed = Vec::with_capacity(BYTES + message.len());
    signed.extend_from_slice(&signature.to_bytes());
    signed.extend_from_slice(message);
    Ok(signed)
}

/// Verify a signed message and return the message.
///
/// # Errors
/// - `SizeMismatch` if `public` is not `PUBLICKEYBYTES` long
/// - `VerificationFailed` if the signature is missing or invalid
pub fn open(signed: &[u8], public: &[u8]) -> Result<Vec<u8>> {
    let operation = "sign::open";
    let key = verifying_key(public, operation)?;

    if signed.len() < BYTES {
        debug!(operation, "signed message shorter than a signature");
        return Err(Error::VerificationFailed { operation });
    }
    let (signature, message) = signed.split_at(BYTES);
    check(&key, signature, message, operation)?;
    Ok(message.to_vec())
}

/// Sign `message`, returning the signature alone.
pub fn sign_detached(message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let key = signing_key(secret, "sign::sign_detached")?;
    Ok(key.sign(message).to_bytes().to_vec())
}

/// Verify a detached signature.
///
/// # Errors
/// - `SizeMismatch` if `signature` or `public` has the wrong length
/// - `VerificationFailed` if the signature is invalid
pub fn verify_detached(signature: &[u8], message: &[u8], public: &[u8]) -> Result<()> {
    let operation = "sign::verify_detached";
    ensure_size(signature.len(), BYTES, "signature", operation)?;
    let key = verifying_key(public, operation)?;
    check(&key, signature, message, operation)
}

fn check(
    key: &VerifyingKey,
    signature: &[u8],
    message: &[u8],
    operation: &'static str,
) -> Result<()> {
    let bytes: &[u8; BYTES] = signature
        .try_into()
        .map_err(|_| Error::VerificationFailed { operation })?;
    let signature = Signature::from_bytes(bytes);

    key.verify_strict(message, &signature).map_err(|_| {
        debug!(operation, "signature fails verification");
        Error::VerificationFailed { operation }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycask_common::encoding::{bin2hex, hex2bin};

    fn generate() -> (Vec<u8>, SecureBuffer) {
        let mut secret = SecureBuffer::of_size(SECRETKEYBYTES).unwrap();
        let public = keypair(&mut secret).unwrap();
        (public, secret)
    }

    #[test]
    fn test_sign_open_roundtrip() {
        let (pk, sk) = generate();
        let signed = sign(b"attack at dawn", sk.as_slice()).unwrap();

        assert_eq!(signed.len(), BYTES + 14);
        assert_eq!(&signed[BYTES..], b"attack at dawn");
        assert_eq!(open(&signed, &pk).unwrap(), b"attack at dawn");
    }

    #[test]
    fn test_tampered_message_fails() {
        let (pk, sk) = generate();
        let mut signed = sign(b"attack at dawn", sk.as_slice()).unwrap();
        let last = signed.len() - 1;
        signed[last] ^= 0x01;

        assert!(open(&signed, &pk).unwrap_err().is_verification_failure());
    }

    #[test]
    fn test_tampered_signature_fails() {
        let (pk, sk) = generate();
        let mut signed = sign(b"msg", sk.as_slice()).unwrap();
        signed[0] ^= 0x80;

        assert!(open(&signed, &pk).unwrap_err().is_verification_failure());
    }

    #[test]
    fn test_short_signed_message_fails() {
        let (pk, _) = generate();
        assert!(open(&[0u8; BYTES - 1], &pk)
            .unwrap_err()
            .is_verification_failure());
    }

    #[test]
    fn test_wrong_public_key_fails() {
        let (_, sk) = generate();
        let (other_pk, _) = generate();
        let signed = sign(b"msg", sk.as_slice()).unwrap();

        assert!(open(&signed, &other_pk).is_err());
    }

    #[test]
    fn test_detached() {
        let (pk, sk) = generate();
        let signature = sign_detached(b"detached", sk.as_slice()).unwrap();

        assert_eq!(signature.len(), BYTES);
        assert!(verify_detached(&signature, b"detached", &pk).is_ok());
        assert!(verify_detached(&signature, b"attached", &pk).is_err());
        assert!(matches!(
            verify_detached(&signature[..63], b"detached", &pk),
            Err(Error::SizeMismatch { argument: "signature", .. })
        ));
    }

    #[test]
    fn test_rfc8032_test_1() {
        let seed = hex2bin("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
            .unwrap();
        let mut secret = SecureBuffer::of_size(SECRETKEYBYTES).unwrap();
        let public = seed_keypair(&seed, &mut secret).unwrap();

        assert_eq!(
            bin2hex(&public),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
        assert_eq!(&secret.as_slice()[32..], &public[..]);

        let signature = sign_detached(b"", secret.as_slice()).unwrap();
        assert_eq!(
            bin2hex(&signature),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
             5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
        assert_eq!(public_from_secret(&secret).unwrap(), public);
    }

    #[test]
    fn test_inconsistent_secret_key() {
        let (_, sk) = generate();
        let mut bad = sk.as_slice().to_vec();
        bad[40] ^= 0xFF;

        assert!(matches!(sign(b"m", &bad), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_invalid_sizes() {
        let mut short = SecureBuffer::of_size(32).unwrap();
        assert!(matches!(
            keypair(&mut short),
            Err(Error::SizeMismatch {
                actual: 32,
                expected: SECRETKEYBYTES,
                ..
            })
        ));
        assert!(matches!(
            sign(b"m", &[0u8; 32]),
            Err(Error::SizeMismatch { .. })
        ));
        assert!(matches!(
            open(&[0u8; 80], &[0u8; 31]),
            Err(Error::SizeMismatch {
                argument: "public key",
                ..
            })
        ));
    }
}
