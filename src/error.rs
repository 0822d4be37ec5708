//! Error taxonomy surfaced by the HTTP layer.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::types::MessageResponse;

/// Failures a request can end in. Every variant maps to one status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Uploaded bytes were not valid UTF-8.
    #[error("file is not valid UTF-8 text: {0}")]
    InputDecode(#[from] std::string::FromUtf8Error),
    /// Multipart body was malformed or lacked the `file` field.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    /// Upload body exceeded the configured size limit.
    #[error("upload too large: {0}")]
    UploadTooLarge(String),
    /// Path segment was not a numeric file id.
    #[error("invalid file id: {0}")]
    InvalidFileId(String),
    /// No stored file carries the requested identifier.
    #[error("file with id {0} not found")]
    NotFound(i64),
    /// Vectoriser/classifier artifact missing, corrupt or incompatible.
    #[error("named-entity model unavailable: {0}")]
    ModelUnavailable(String),
    /// Underlying persistence operation failed.
    #[error("storage error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputDecode(_) | Self::InvalidUpload(_) | Self::InvalidFileId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ModelUnavailable(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ServiceError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::UploadTooLarge(err.body_text())
        } else {
            Self::InvalidUpload(err.body_text())
        }
    }
}

impl From<MultipartRejection> for ServiceError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidUpload(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidFileId(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
