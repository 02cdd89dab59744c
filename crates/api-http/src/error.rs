//! HTTP Error Mapping
//!
//! Maps application errors to status codes and plain-text bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskgate_core::error::AppError;
use thiserror::Error;

const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// AppError rendered as an HTTP response
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HttpError(#[from] pub AppError);

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Any body rejection (content type, syntax, shape) is a 400
impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        (status, self.body()).into_response()
    }
}

impl HttpError {
    /// Response text; storage and internal failures stay in the log
    fn body(&self) -> String {
        public_message(&self.0)
    }
}

fn public_message(err: &AppError) -> String {
    match err {
        AppError::NotFound(_)
        | AppError::Validation(_)
        | AppError::InvalidState(_)
        | AppError::Domain(_) => err.to_string(),
        AppError::ReportApply {
            index,
            task_id,
            source,
        } => format!(
            "Failed to apply report #{} for task {}: {}",
            index,
            task_id,
            public_message(source)
        ),
        _ => INTERNAL_ERROR_BODY.to_string(),
    }
}
