// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`HookboxError`] onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookbox_core::HookboxError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// A [`HookboxError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub HookboxError);

impl From<HookboxError> for ApiError {
    fn from(err: HookboxError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HookboxError::InvalidSignature => StatusCode::UNAUTHORIZED,
            HookboxError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HookboxError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HookboxError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match &self.0 {
            HookboxError::InvalidSignature => "invalid signature".to_string(),
            HookboxError::Validation(msg) => msg.clone(),
            HookboxError::Storage { .. } => "storage unavailable".to_string(),
            HookboxError::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}
