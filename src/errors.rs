use thiserror::Error;

/// Errors surfaced by the client library. Messages are meant to be shown to the
/// user as-is, so they never carry token or password material.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Session expired. Please sign in again.")]
    Unauthorized,
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// Message suitable for inline display next to a form.
    #[must_use]
    pub fn inline_message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
