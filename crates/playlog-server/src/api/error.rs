//! Error responses
//!
//! Every failure is reported as
//! `{"error": true, "errorcode": "...", "message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playlog_core::Error;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    /// Error raised by the playback service
    Core(Error),
    /// Request body could not be decoded into a remote call
    BadRequest(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                Error::UnknownEvent(_) | Error::MissingField { .. } => StatusCode::BAD_REQUEST,
                Error::Unauthenticated => StatusCode::UNAUTHORIZED,
                Error::AccessDenied { .. } => StatusCode::FORBIDDEN,
                Error::ContextNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "INVALID_PARAMETER",
            ApiError::Core(err) => err.error_code(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Core(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), "{}", self.message());
        } else {
            warn!(status = status.as_u16(), code = self.code(), "{}", self.message());
        }

        let body = json!({
            "error": true,
            "errorcode": self.code(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}
