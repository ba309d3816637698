//! Response envelope normalization.
//!
//! Most endpoints wrap their payload as `{success, message, data}`; a few
//! return the payload as the whole body. Each endpoint declares which with a
//! [`Shape`], and decoding goes through [`Shape::decode`] only.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PayloadError, PayloadResult};

/// The `{success, message, data}` wrapper used by enveloped endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }
}

fn default_success() -> bool {
    true
}

/// Where the payload sits inside a response body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    /// The body is the payload.
    Bare,
    /// The payload is `body.data`.
    Enveloped,
}

impl Shape {
    /// Decode a response body into `T` according to this shape.
    ///
    /// A blank body decodes as JSON `null`, so `()` and `Option<_>` payloads
    /// accept `204 No Content` responses.
    pub fn decode<T: DeserializeOwned>(self, body: &[u8]) -> PayloadResult<T> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Null).map_err(PayloadError::decode);
        }

        match self {
            Shape::Bare => serde_json::from_slice(body).map_err(PayloadError::decode),
            Shape::Enveloped => {
                let envelope: Envelope<Option<Value>> =
                    serde_json::from_slice(body).map_err(PayloadError::decode)?;
                if !envelope.success {
                    return Err(PayloadError::rejected(
                        envelope
                            .message
                            .unwrap_or_else(|| "request was not successful".to_string()),
                    ));
                }
                serde_json::from_value(envelope.data.unwrap_or(Value::Null))
                    .map_err(PayloadError::decode)
            }
        }
    }
}
