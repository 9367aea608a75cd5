//! HTTP handlers for the monitor.
//!
//! Errors render as `{"error": <CODE>, "message": <text>}` with the status
//! derived from the core error's client code.

pub mod monitor;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use statwatch_core::error::{ClientCode, MonitorError};

/// HTTP-facing wrapper around the core error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub MonitorError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::OutOfOrder => StatusCode::CONFLICT,
            ClientCode::Stopped => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
