//! Common error types for keycask.

use thiserror::Error;

/// Top-level error type for keycask operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument does not have the exact length the primitive requires.
    #[error(
        "{argument} has invalid size: {actual} bytes, instead of expected size {expected} bytes, used in function {operation}"
    )]
    SizeMismatch {
        argument: &'static str,
        actual: usize,
        expected: usize,
        operation: &'static str,
    },

    /// A MAC, signature or authenticated ciphertext did not validate.
    #[error("Verification failed in {operation}")]
    VerificationFailed { operation: &'static str },

    /// Ciphertext is shorter than the authenticator it must carry.
    #[error("Ciphertext too short in {operation}: {actual} bytes, need at least {minimum}")]
    CiphertextTooShort {
        actual: usize,
        minimum: usize,
        operation: &'static str,
    },

    /// Encoded text is malformed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The operating system refused to lock memory.
    #[error("Cannot lock memory: {0}")]
    MemoryLock(String),

    /// Index outside of a buffer.
    #[error("Index {index} out of range for buffer of {len} bytes")]
    OutOfRange { index: usize, len: usize },

    /// Key material is structurally unusable.
    #[error("Invalid key: {0}")]
    InvalidKey(&'static str),

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl Error {
    /// Whether this error reports a failed authenticity check.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Error::VerificationFailed { .. })
    }
}

/// Fail with [`Error::SizeMismatch`] unless `actual == expected`.
pub fn ensure_size(
    actual: usize,
    expected: usize,
    argument: &'static str,
    operation: &'static str,
) -> Result<()> {
    if actual != expected {
        return Err(Error::SizeMismatch {
            argument,
            actual,
            expected,
            operation,
        });
    }
    Ok(())
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
