use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{BookOtpError, ErrorKind, HttpStatusCode};

// Include the client module
pub mod client;

/// The single response shape of every endpoint.
///
/// Success: `{"ok": true, "data": ...}`.
/// Failure: `{"ok": false, "kind": "...", "detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            kind: None,
            detail: None,
        }
    }
}

impl ApiEnvelope<()> {
    pub fn failure(err: &BookOtpError) -> Self {
        Self {
            ok: false,
            data: None,
            kind: Some(err.kind()),
            detail: Some(err.public_detail()),
        }
    }
}

/// Implement IntoResponse for BookOtpError so handlers can return it with `?`.
impl IntoResponse for BookOtpError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!(kind = ?self.kind(), error = %self, "request failed");
        } else {
            warn!(kind = ?self.kind(), error = %self, "request rejected");
        }

        (status_code, Json(ApiEnvelope::failure(&self))).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
