//! Cryptographic primitives for keycask.
//!
//! This module provides size-checked wrappers around fixed-size primitives:
//! - Secret-key and public-key authenticated encryption (XSalsa20-Poly1305)
//! - Message authentication (HMAC-SHA-512-256, Poly1305)
//! - Ed25519 signatures and X25519 key agreement
//! - Hashing (SHA-512, SipHash-2-4, BLAKE2b) and the XSalsa20 stream cipher
//!
//! # Security Guarantees
//! - Every key, nonce and tag is checked against its exact required length
//! - Secret outputs are returned in locked, self-wiping [`SecureBuffer`]s
//! - No plaintext or key material is ever logged
//! - Constant-time comparison for every authenticator check

pub mod auth;
pub mod cryptobox;
pub mod hash;
pub mod keys;
mod nacl;
pub mod onetimeauth;
pub mod random;
pub mod scalarmult;
pub mod secretbox;
pub mod sign;
pub mod stream;

pub use keycask_common::{encoding, Encoding, Error, Result, SecureBuffer};
pub use keys::{BoxKeyPair, SignKeyPair};
pub use random::{random_bytes, random_bytes_locked};
