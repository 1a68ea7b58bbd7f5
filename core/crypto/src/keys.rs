//! Key pair types with secure memory handling.
//!
//! Secret halves live in [`SecureBuffer`]s, so they are locked while held
//! and wiped on drop. Public halves are plain bytes.

use std::fmt;

use keycask_common::{Result, SecureBuffer};

use crate::{cryptobox, scalarmult, sign};

/// Curve25519 key pair for [`cryptobox`] and [`scalarmult`].
pub struct BoxKeyPair {
    public: Vec<u8>,
    secret: SecureBuffer,
}

impl BoxKeyPair {
    /// Generate a random key pair.
    ///
    /// # Errors
    /// - `MemoryLock` if the secret key cannot be locked
    pub fn generate() -> Result<Self> {
        let mut secret = SecureBuffer::of_size(cryptobox::SECRETKEYBYTES)?;
        let public = cryptobox::keypair(&mut secret)?;
        Ok(Self { public, secret })
    }

    /// Rebuild a key pair from its secret key.
    ///
    /// # Errors
    /// - `SizeMismatch` if `secret` is not `SECRETKEYBYTES` long
    pub fn from_secret(secret: SecureBuffer) -> Result<Self> {
        let public = scalarmult::public_from_secret(&secret)?;
        Ok(Self { public, secret })
    }

    /// Get the public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    /// Get the secret key.
    ///
    /// # Security
    /// The returned buffer should be used immediately and not copied.
    pub fn secret_key(&self) -> &SecureBuffer {
        &self.secret
    }

    /// Shared secret with a peer, in locked memory.
    pub fn agree(&self, peer_public: &[u8]) -> Result<SecureBuffer> {
        scalarmult::key_agreement(&self.secret, peer_public)
    }

    /// Box `message` for the holder of `peer_public`.
    pub fn seal(&self, message: &[u8], nonce: &[u8], peer_public: &[u8]) -> Result<Vec<u8>> {
        cryptobox::seal(message, nonce, peer_public, self.secret.as_slice())
    }

    /// Open a box sent by the holder of `peer_public`.
    pub fn open(&self, ciphertext: &[u8], nonce: &[u8], peer_public: &[u8]) -> Result<Vec<u8>> {
        cryptobox::open(ciphertext, nonce, peer_public, self.secret.as_slice())
    }
}

impl fmt::Debug for BoxKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxKeyPair {{ public: {:02x?}, secret: [REDACTED] }}", self.public)
    }
}

/// Ed25519 key pair for [`sign`].
pub struct SignKeyPair {
    public: Vec<u8>,
    secret: SecureBuffer,
}

impl SignKeyPair {
    /// Generate a random key pair.
    pub fn generate() -> Result<Self> {
        let mut secret = SecureBuffer::of_size(sign::SECRETKEYBYTES)?;
        let public = sign::keypair(&mut secret)?;
        Ok(Self { public, secret })
    }

    /// Derive a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let mut secret = SecureBuffer::of_size(sign::SECRETKEYBYTES)?;
        let public = sign::seed_keypair(seed, &mut secret)?;
        Ok(Self { public, secret })
    }

    /// Rebuild a key pair from its 64-byte secret key.
    pub fn from_secret(secret: SecureBuffer) -> Result<Self> {
        let public = sign::public_from_secret(&secret)?;
        Ok(Self { public, secret })
    }

    /// Get the public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    /// Get the secret key.
    pub fn secret_key(&self) -> &SecureBuffer {
        &self.secret
    }

    /// Sign `message`, returning `signature || message`.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        sign::sign(message, self.secret.as_slice())
    }

    /// Sign `message`, returning the signature alone.
    pub fn sign_detached(&self, message: &[u8]) -> Result<Vec<u8>> {
        sign::sign_detached(message, self.secret.as_slice())
    }
}

impl fmt::Debug for SignKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignKeyPair {{ public: {:02x?}, secret: [REDACTED] }}", self.public)
    }
}
