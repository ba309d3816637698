//! Client error model.

use qms_auth::StoreError;
use qms_core::PayloadError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown when the server gave nothing better.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Network, TLS or protocol failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server responded with {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
        body: String,
    },

    /// An enveloped 2xx response carried `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Payload(PayloadError),

    /// A refresh was needed but no refresh token is stored.
    #[error("no refresh token stored; login required")]
    NoRefreshToken,

    /// The session ended while this request waited to be replayed.
    #[error("session expired; login required")]
    SessionExpired,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

impl From<PayloadError> for ClientError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Rejected(message) => Self::Rejected(message),
            other => Self::Payload(other),
        }
    }
}

impl ClientError {
    /// Build a status error from a raw response body.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let detail = extract_detail(&body);
        Self::Status { status, detail, body }
    }

    /// The status survives even when the body cannot be read.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        match response.text().await {
            Ok(body) => Self::from_status(status, body),
            Err(err) => {
                tracing::debug!(error = %err, %status, "error body unreadable");
                Self::Status {
                    status,
                    detail: None,
                    body: String::new(),
                }
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// True when the only way forward is a new login.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NoRefreshToken | Self::SessionExpired) || self.is_unauthorized()
    }

    /// Server-provided explanation, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            Self::Rejected(message) => Some(message),
            _ => None,
        }
    }

    /// Text suitable for an alert banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout => "The server took too long to respond.".to_string(),
            Self::NoRefreshToken | Self::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            _ => self
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Pull a human message out of an error body.
///
/// Understands `{"detail": "..."}`, validation lists
/// (`{"detail": [{"loc": [...], "msg": "..."}]}`), `{"message": "..."}` and
/// `{"error": "..."}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .and_then(Value::as_str);
                    Some(match field {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
