//! Text encodings for keys and payloads.
//!
//! Supported schemes are identity (`binary`), lowercase hex, Z85 with a
//! padding count prefix, and standard base64.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, SecureBuffer};

/// Z85 encodes groups of this many bytes.
const Z85_GROUP: usize = 4;

/// Each Z85 group becomes this many characters.
const Z85_CHARS: usize = 5;

/// Encoding scheme for byte sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Raw bytes, unchanged.
    Binary,
    /// Lowercase hexadecimal, two digits per byte.
    Hex,
    /// Z85 with a leading padding count character.
    Z85,
    /// Standard padded base64.
    Base64,
}

impl Encoding {
    /// Lowercase scheme name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Binary => "binary",
            Encoding::Hex => "hex",
            Encoding::Z85 => "z85",
            Encoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Encoding::Binary),
            "hex" => Ok(Encoding::Hex),
            "z85" => Ok(Encoding::Z85),
            "base64" => Ok(Encoding::Base64),
            other => Err(Error::Decode(format!("Unknown encoding: {}", other))),
        }
    }
}

/// Encode `bytes` with the given scheme.
pub fn encode(bytes: &[u8], encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Binary => bytes.to_vec(),
        Encoding::Hex => bin2hex(bytes).into_bytes(),
        Encoding::Z85 => z85_encode_padded(bytes).into_bytes(),
        Encoding::Base64 => STANDARD.encode(bytes).into_bytes(),
    }
}

/// Decode `text` that was produced with the given scheme.
///
/// # Errors
/// - `Decode` if the text is malformed for the scheme
pub fn decode(text: &[u8], encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Binary => Ok(text.to_vec()),
        Encoding::Hex => hex_decode(text),
        Encoding::Z85 => z85_decode_padded(text),
        Encoding::Base64 => STANDARD
            .decode(text)
            .map_err(|e| Error::Decode(format!("invalid base64: {}", e))),
    }
}

/// Decode `text` directly into locked memory.
///
/// Use this for encoded key material; the intermediate plain copy is wiped.
pub fn decode_locked(text: &[u8], encoding: Encoding) -> Result<SecureBuffer> {
    SecureBuffer::from_vec(decode(text, encoding)?)
}

/// Lowercase hex encoding.
pub fn bin2hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text.
///
/// # Errors
/// - `Decode` if the length is odd or a character is not a hex digit
pub fn hex2bin(text: &str) -> Result<Vec<u8>> {
    hex_decode(text.as_bytes())
}

fn hex_decode(text: &[u8]) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| match e {
        hex::FromHexError::OddLength => Error::Decode("hex length must be even".to_string()),
        _ => Error::Decode("string must be all hexadecimal digits".to_string()),
    })
}

fn z85_encode_padded(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let tail = bytes.len() % Z85_GROUP;
    let mut padded = bytes.to_vec();
    if tail != 0 {
        padded.resize(bytes.len() + Z85_GROUP - tail, 0);
    }

    // Number of meaningful bytes in the last group
    let count = if tail == 0 { Z85_GROUP } else { tail };
    let mut out = String::with_capacity(1 + padded.len() / Z85_GROUP * Z85_CHARS);
    out.push(char::from(b'0' + count as u8));
    out.push_str(&z85::encode(&padded));
    out
}

fn z85_decode_padded(text: &[u8]) -> Result<Vec<u8>> {
    let Some((&count, body)) = text.split_first() else {
        return Ok(Vec::new());
    };

    let count = match count {
        b'1'..=b'4' => usize::from(count - b'0'),
        _ => return Err(Error::Decode("invalid z85 padding count".to_string())),
    };
    if body.is_empty() || body.len() % Z85_CHARS != 0 {
        return Err(Error::Decode(format!(
            "z85 body length must be a non-zero multiple of {}, got {}",
            Z85_CHARS,
            body.len()
        )));
    }

    let mut decoded =
        z85::decode(body).map_err(|_| Error::Decode("invalid z85 text".to_string()))?;

    let padding = Z85_GROUP - count;
    let len = decoded.len() - padding;
    if decoded[len..].iter().any(|&b| b != 0) {
        return Err(Error::Decode("z85 padding is not zero".to_string()));
    }
    decoded.truncate(len);
    Ok(decoded)
}
