//! Error-to-HTTP response conversion.
//!
//! The wiki answers in plain text, so errors do too: the status derived from
//! [`bw_core::Error::http_status`] and the error message as the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub bw_core::Error);

impl From<bw_core::Error> for AppError {
    fn from(e: bw_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in handler");
        }

        (status, self.0.to_string()).into_response()
    }
}
