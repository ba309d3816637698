//! Payload error model.

use thiserror::Error;

/// Result type used for encoding/decoding wire payloads.
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Failure to interpret or produce a wire payload.
///
/// These are deterministic: retrying the same request yields the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// An enveloped response reported `success: false`.
    #[error("request rejected by server: {0}")]
    Rejected(String),

    /// A request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// Query parameters could not be flattened into key/value pairs.
    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl PayloadError {
    pub fn decode(err: impl core::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn encode(err: impl core::fmt::Display) -> Self {
        Self::Encode(err.to_string())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
