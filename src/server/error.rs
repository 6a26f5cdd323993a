//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::KvError;

/// An engine or service failure rendered as a plain-text response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

/// Status code for an engine failure
///
/// - invalid key type or storage name → 400
/// - missing storage, key type or key → 404
/// - storage already exists → 409
/// - anything else (I/O, corrupt data) → 500
pub fn status_for(err: &KvError) -> StatusCode {
    match err {
        KvError::InvalidKeyType { .. } | KvError::InvalidStorageName(..) => {
            StatusCode::BAD_REQUEST
        }
        KvError::NotFound(_) | KvError::NoSuchKeyType(_) | KvError::KeyNotFound => {
            StatusCode::NOT_FOUND
        }
        KvError::AlreadyExists(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<KvError> for ApiError {
    fn from(err: KvError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
