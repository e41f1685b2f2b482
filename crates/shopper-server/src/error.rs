//! Error types for the shopper server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use shopper_core::ShopperError;
use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while serving a request or starting the server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing or empty Authorization header.")]
    MissingSessionHeader,

    #[error("No session found for: {0}.")]
    UnknownSession(String),

    /// JSON body could not be read as a chat message
    #[error("Invalid request body: {0}")]
    Json(#[from] serde_json::Error),

    /// The search service acknowledged the query with a failure. Carries the
    /// conversational reply shown to the user.
    #[error("{0}")]
    UpstreamFailure(String),

    /// The search service could not be reached or answered with garbage
    #[error("Search service unavailable: {0}")]
    Gateway(#[source] ShopperError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ShopperError> for ServerError {
    fn from(err: ShopperError) -> Self {
        match err {
            ShopperError::SessionNotFound(id) => ServerError::UnknownSession(id),
            ShopperError::ConfigError(msg) => ServerError::Config(msg),
            err if err.is_gateway_failure() => ServerError::Gateway(err),
            err => ServerError::Internal(err.to_string()),
        }
    }
}

/// Convert ServerError to HTTP status code
impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::MissingSessionHeader | ServerError::UnknownSession(_) => 401,
            ServerError::Json(_) | ServerError::UpstreamFailure(_) => 400,
            ServerError::Gateway(_) => 502,
            ServerError::Io(_) | ServerError::Config(_) | ServerError::Internal(_) => 500,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::MissingSessionHeader => "missing_session",
            ServerError::UnknownSession(_) => "unknown_session",
            ServerError::Json(_) => "json_error",
            ServerError::UpstreamFailure(_) => "upstream_failure",
            ServerError::Gateway(_) => "gateway_error",
            ServerError::Io(_) => "io_error",
            ServerError::Config(_) => "config_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            log::error!("Request failed ({}): {}", self.error_type(), self);
        } else {
            log::warn!("Request rejected ({}): {}", self.error_type(), self);
        }

        let body = Json(json!({
            "error": self.error_type(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServerError::MissingSessionHeader.status_code(), 401);
        assert_eq!(ServerError::UnknownSession("x".into()).status_code(), 401);
        let bad_body = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(ServerError::Json(bad_body).status_code(), 400);
        assert_eq!(ServerError::UpstreamFailure("x".into()).status_code(), 400);
        assert_eq!(
            ServerError::Gateway(ShopperError::SearchTimeout(Duration::from_secs(2))).status_code(),
            502
        );
        assert_eq!(ServerError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_messages_match_client_contract() {
        assert_eq!(
            ServerError::MissingSessionHeader.to_string(),
            "Missing or empty Authorization header."
        );
        assert_eq!(
            ServerError::UnknownSession("abc".into()).to_string(),
            "No session found for: abc."
        );
        assert_eq!(
            ServerError::UpstreamFailure("Invalid keyword".into()).to_string(),
            "Invalid keyword"
        );
    }

    #[test]
    fn test_from_shopper_error() {
        let err: ServerError = ShopperError::SessionNotFound("abc".into()).into();
        assert!(matches!(err, ServerError::UnknownSession(ref id) if id == "abc"));

        let err: ServerError = ShopperError::SearchStatus { status: 503 }.into();
        assert_eq!(err.status_code(), 502);

        let err: ServerError = ShopperError::MalformedResponse("bad".into()).into();
        assert_eq!(err.error_type(), "gateway_error");

        let err: ServerError = ShopperError::InternalError("boom".into()).into();
        assert_eq!(err.status_code(), 500);
    }
}
