//! Custom error types for the API client

use auth::{PipelineError, RefreshError};
use common::StorageError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::validation::FieldError;

/// Error body returned by the backend for 4xx and 5xx responses
///
/// Most endpoints send `{ code, message, details }`; a few older ones only
/// send `{ error }`, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Message shown when the backend gives no usable explanation
pub fn fallback_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "請求參數錯誤",
        401 => "請先登入",
        403 => "您無權訪問此資源",
        404 => "找不到請求的資源",
        409 => "資源衝突",
        500 => "伺服器內部錯誤，請稍後再試",
        _ => "網路錯誤，請檢查連線",
    }
}

/// Custom error type for the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 400 from the backend
    #[error("{message}")]
    Validation { code: Option<String>, message: String },

    /// 401 that survived the refresh-and-retry cycle
    #[error("{0}")]
    Unauthorized(String),

    /// 403 from the backend
    #[error("{0}")]
    Forbidden(String),

    /// 404 from the backend
    #[error("{0}")]
    NotFound(String),

    /// 409 from the backend
    #[error("{message}")]
    Conflict { code: Option<String>, message: String },

    /// 5xx or any other unexpected status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The access token could not be refreshed; the user must log in again
    #[error("Session expired: {0}")]
    SessionExpired(#[source] RefreshError),

    /// Input rejected before it was sent
    #[error("Invalid input: {}", describe_fields(.0))]
    InvalidInput(Vec<FieldError>),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Any other pipeline failure
    #[error("Pipeline error: {0}")]
    Pipeline(PipelineError),
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Map a non-success response to the error taxonomy
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorResponse = serde_json::from_slice(body).unwrap_or_default();
        let code = parsed.code;
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback_message(status).to_string());

        match status {
            StatusCode::BAD_REQUEST => ApiError::Validation { code, message },
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict { code, message },
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the caller is not (or no longer) authenticated
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::SessionExpired(_))
    }

    /// Whether the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Transport(e) => ApiError::Transport(e),
            PipelineError::RefreshFailed(e) => ApiError::SessionExpired(e),
            PipelineError::Storage(e) => ApiError::Storage(e),
            other => ApiError::Pipeline(other),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let body = r#"{"code":"ORDER_NOT_FOUND","message":"找不到該訂單"}"#.as_bytes();

        let error = ApiError::from_response(StatusCode::NOT_FOUND, body);

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "找不到該訂單");
    }

    #[test]
    fn test_error_only_body() {
        let body = r#"{"error":"未登入"}"#.as_bytes();

        let error = ApiError::from_response(StatusCode::UNAUTHORIZED, body);

        assert!(error.is_unauthorized());
        assert_eq!(error.to_string(), "未登入");
    }

    #[test]
    fn test_fallback_messages() {
        let cases = [
            (StatusCode::BAD_REQUEST, "請求參數錯誤"),
            (StatusCode::FORBIDDEN, "您無權訪問此資源"),
            (StatusCode::CONFLICT, "資源衝突"),
            (StatusCode::INTERNAL_SERVER_ERROR, "伺服器內部錯誤，請稍後再試"),
            (StatusCode::BAD_GATEWAY, "網路錯誤，請檢查連線"),
        ];

        for (status, expected) in cases {
            let error = ApiError::from_response(status, b"");
            assert_eq!(error.to_string(), expected, "status {}", status);
        }
    }

    #[test]
    fn test_conflict_keeps_code() {
        let body = br#"{"code":"ALREADY_OWNED","message":"already owned"}"#;

        match ApiError::from_response(StatusCode::CONFLICT, body) {
            ApiError::Conflict { code, .. } => assert_eq!(code.as_deref(), Some("ALREADY_OWNED")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_refresh_failure_maps_to_session_expired() {
        let error = ApiError::from(PipelineError::RefreshFailed(RefreshError::Rejected(401)));
        assert!(matches!(error, ApiError::SessionExpired(_)));
        assert!(error.is_unauthorized());
    }
}
