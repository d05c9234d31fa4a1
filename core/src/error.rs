//! Error types for the Thaw API client.
//!
//! # Design
//! A transport failure (`Unreachable`) is kept apart from a reply that could
//! not be decoded. Application-level failures are not errors here: a 4xx
//! reply with a JSON body is handed back like any other reply.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection,
    /// TLS handshake, timeout).
    #[error("can't reach target {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body, or a value handed to the pretty-printer, did not
    /// have the expected JSON shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable { .. })
    }
}
