//! Error types for the HTTP client.

use graphmail_filter::FilterError;
use graphmail_model::ModelError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the mailbox API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or body transfer failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status from the server.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Missing or rejected credentials.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Malformed JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Well-formed JSON with an unexpected shape for a property.
    #[error("cannot decode {property}: {reason}")]
    Decode { property: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn decode(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

impl From<graphmail_types::Error> for ClientError {
    fn from(err: graphmail_types::Error) -> Self {
        Self::Model(err.into())
    }
}

/// Model errors pass through; everything else surfaces as a transport failure.
impl From<ClientError> for ModelError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Model(inner) => inner,
            other => ModelError::Transport(other.to_string()),
        }
    }
}
