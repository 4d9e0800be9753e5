//! Error types for the Mattermost API client.
//!
//! # Design
//! Caller bugs and runtime failures are separate variants. `Precondition`
//! means an operation ran before the session held the state it needs (URL,
//! team id, channel id, token) and no request was sent. `Authentication`
//! and `HttpError` mean the server answered, but not with what the
//! operation needed.

use std::fmt;

use thiserror::Error;

/// Piece of session state an operation required but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingState {
    Url,
    TeamId,
    ChannelId,
    AuthToken,
}

impl fmt::Display for MissingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingState::Url => write!(f, "url is not set"),
            MissingState::TeamId => write!(f, "team id is not set"),
            MissingState::ChannelId => write!(f, "channel id is not set"),
            MissingState::AuthToken => write!(f, "not logged in"),
        }
    }
}

/// Errors returned by `MattermostClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation was invoked before required session state was set.
    /// No network call was attempted.
    #[error("precondition violated: {0}")]
    Precondition(MissingState),

    /// Login returned a non-200 status or no `Token` header.
    #[error("could not obtain an auth token ({reason}); verify the server URL, login id and password")]
    Authentication { reason: String },

    /// The server returned a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, ApiError::Precondition(_))
    }
}

impl From<MissingState> for ApiError {
    fn from(missing: MissingState) -> Self {
        ApiError::Precondition(missing)
    }
}

/// Result type alias using `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
