//! Common utilities and types shared across keycask modules.
//!
//! This module provides the error type, the locked [`SecureBuffer`] that
//! holds secret bytes, and the text encodings used to serialize keys.

pub mod encoding;
pub mod error;
pub mod locked;

pub use encoding::{decode, decode_locked, encode, Encoding};
pub use error::{ensure_size, Error, Result};
pub use locked::SecureBuffer;
