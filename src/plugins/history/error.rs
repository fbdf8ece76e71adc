use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryError {
    NotFound { message: String },
    Busy { message: String },
    InvalidInput { message: String },
    Internal { message: String },
}

impl HistoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Busy { message }
            | Self::InvalidInput { message }
            | Self::Internal { message } => message,
        }
    }
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { message } => write!(f, "NotFound: {}", message),
            Self::Busy { message } => write!(f, "Busy: {}", message),
            Self::InvalidInput { message } => write!(f, "InvalidInput: {}", message),
            Self::Internal { message } => write!(f, "Internal: {}", message),
        }
    }
}

impl std::error::Error for HistoryError {}
