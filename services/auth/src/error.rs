//! Custom error types for the authentication layer

use common::error::StorageError;
use thiserror::Error;

/// Why a refresh exchange did not yield a new access token
///
/// Cloneable so a single outcome can be handed to every request waiting on
/// the same exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-success status
    #[error("Refresh token rejected with status {0}")]
    Rejected(u16),

    /// The refresh call did not complete
    #[error("Refresh request failed: {0}")]
    Transport(String),

    /// The task driving the exchange was dropped before it finished
    #[error("Refresh abandoned before completion")]
    Abandoned,
}

/// Custom error type for the authenticated request pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Network failure on the original call
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request path could not be resolved against the backend URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The stored access token cannot be used as a header value
    #[error("Stored access token is not a valid header value")]
    InvalidToken,

    /// Credential storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The session expired and could not be recovered
    #[error("Session expired: {0}")]
    RefreshFailed(#[source] RefreshError),
}

/// Type alias for pipeline results
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Custom error type for the login flow
#[derive(Error, Debug)]
pub enum LoginError {
    /// The provider or backend reported an error on the callback
    #[error("Login failed: {0}")]
    Provider(String),

    /// The callback carried no access token
    #[error("No access token received")]
    MissingAccessToken,

    /// Session information could not be fetched after storing the token
    #[error("Failed to fetch session information (status {0})")]
    Session(u16),

    /// Pipeline failure while talking to the backend
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Session information could not be decoded or stored
    #[error("Invalid session payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<StorageError> for LoginError {
    fn from(err: StorageError) -> Self {
        LoginError::Pipeline(PipelineError::Storage(err))
    }
}

impl From<reqwest::Error> for LoginError {
    fn from(err: reqwest::Error) -> Self {
        LoginError::Pipeline(PipelineError::Transport(err))
    }
}

/// Type alias for login results
pub type LoginResult<T> = Result<T, LoginError>;
