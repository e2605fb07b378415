//! Base64url codec shared by the transport and the platform authenticator.
//!
//! Challenges, user handles and response payloads cross two boundaries with
//! different binary representations: the relying party speaks base64url-encoded
//! strings inside JSON, the platform authenticator wants raw bytes. All
//! conversion between the two goes through this module so both sides agree on
//! a single encoding (URL-safe alphabet, no padding).

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;

/// Errors from the base64url codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input was not valid unpadded base64url
    #[error("Invalid base64url: {0}")]
    Format(String),
}

/// Decode an unpadded base64url string into raw bytes.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, CodecError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| CodecError::Format(e.to_string()))
}

/// Encode raw bytes as an unpadded base64url string.
pub fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}
