//! Shared HTTP plumbing for the auth backend and the AI gateway.
//!
//! Credentials are never stored on the client; each call takes its bearer
//! token explicitly.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HttpError {
    Unauthorized { message: String },
    Server { status: u16, message: Option<String> },
    Transport { message: String },
    Decode { message: String },
}

impl HttpError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status carried by the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Server { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The `message` field of the server's error body, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } if !message.is_empty() => Some(message),
            Self::Server {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { message } | Self::Transport { message } | Self::Decode { message } => {
                message.clone()
            }
            Self::Server { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("HTTP {}", status)),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            Self::Server {
                status,
                message: Some(message),
            } => write!(f, "Server({}): {}", status, message),
            Self::Server {
                status,
                message: None,
            } => write!(f, "Server({})", status),
            Self::Transport { message } => write!(f, "Transport: {}", message),
            Self::Decode { message } => write!(f, "Decode: {}", message),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode(err.to_string());
        }
        match err.status() {
            Some(status) if status.as_u16() == 401 => Self::unauthorized(err.to_string()),
            Some(status) => Self::server(status.as_u16(), None),
            None => Self::transport(err.to_string()),
        }
    }
}

pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(8)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Join `path` onto an already-normalized base URL.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Read a response body, mapping non-2xx statuses to [`HttpError`].
///
/// A successful body that is not JSON comes back as a JSON string so callers
/// can still display it. An empty body is `null`.
pub async fn read_json(response: reqwest::Response) -> Result<Value, HttpError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)));
    }

    let message = extract_message(&body);
    if status.as_u16() == 401 {
        return Err(HttpError::unauthorized(message.unwrap_or_default()));
    }
    Err(HttpError::server(status.as_u16(), message))
}

/// Pull a displayable `message` out of an error body.
///
/// Validation failures sometimes carry a list of messages; they are joined.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}
