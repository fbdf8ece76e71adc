use serde::{Deserialize, Serialize};

use crate::services::http::HttpError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthError {
    /// Form input rejected before anything was sent.
    Validation { field: String, message: String },
    Unauthorized { message: String },
    Server { message: String },
    Transport { message: String },
    Storage { message: String },
}

impl AuthError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Map a failed auth call to what the form shows: the server's own
    /// message when it sent one, `fallback` otherwise.
    pub fn from_http(err: HttpError, fallback: &str) -> Self {
        let shown = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        match err {
            HttpError::Unauthorized { .. } => Self::unauthorized(shown),
            HttpError::Server { .. } | HttpError::Decode { .. } => Self::server(shown),
            HttpError::Transport { message } => {
                log::warn!("Auth backend unreachable: {}", message);
                Self::transport(shown)
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Unauthorized { message }
            | Self::Server { message }
            | Self::Transport { message }
            | Self::Storage { message } => message,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => write!(f, "Validation({}): {}", field, message),
            Self::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            Self::Server { message } => write!(f, "Server: {}", message),
            Self::Transport { message } => write!(f, "Transport: {}", message),
            Self::Storage { message } => write!(f, "Storage: {}", message),
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_prefers_server_message() {
        let err = AuthError::from_http(
            HttpError::server(409, Some("Email already registered".to_string())),
            "Signup Failed.",
        );
        assert_eq!(err, AuthError::server("Email already registered"));
    }

    #[test]
    fn test_from_http_falls_back() {
        let err = AuthError::from_http(HttpError::server(500, None), "Login failed.");
        assert_eq!(err.message(), "Login failed.");

        let err = AuthError::from_http(HttpError::transport("refused"), "Login failed.");
        assert!(matches!(err, AuthError::Transport { .. }));
        assert_eq!(err.message(), "Login failed.");

        let err = AuthError::from_http(HttpError::unauthorized(""), "Failed to update profile");
        assert_eq!(err, AuthError::unauthorized("Failed to update profile"));
    }
}
