//! Gateway error type and its HTTP mapping.
//!
//! | Error | Status |
//! |---|---|
//! | invalid body / `InvalidInput` | 400 |
//! | `NotFound` | 404 |
//! | `DuplicateId` | 409 |
//! | `StoreUnavailable` / internal | 500, generic message |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookshelf_core::db::DbError;
use bookshelf_core::{BookServiceError, StoreError};
use log::{debug, error};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

const INVALID_BODY_MESSAGE: &str = "Invalid input";
const INTERNAL_MESSAGE: &str = "internal storage error";

#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be decoded.
    InvalidBody(String),
    Service(BookServiceError),
    /// Blocking worker failed before producing a result.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Service(BookServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Service(BookServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(BookServiceError::DuplicateId(_)) => StatusCode::CONFLICT,
            Self::Service(BookServiceError::StoreUnavailable(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidBody(_) => INVALID_BODY_MESSAGE.to_string(),
            Self::Service(BookServiceError::StoreUnavailable(_)) | Self::Internal(_) => {
                INTERNAL_MESSAGE.to_string()
            }
            Self::Service(err) => err.to_string(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBody(message) => write!(f, "invalid request body: {message}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookServiceError> for ApiError {
    fn from(value: BookServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Service(value.into())
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        StoreError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=gateway status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            debug!(
                "event=request_rejected module=gateway status=ok http_status={} reason={}",
                status.as_u16(),
                self
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::{BookField, BookValidationError};

    #[test]
    fn test_service_errors_map_to_distinct_statuses() {
        let cases = [
            (
                ApiError::from(BookServiceError::InvalidInput(
                    BookValidationError::MissingField(BookField::Title),
                )),
                StatusCode::BAD_REQUEST,
            ),
            (
                BookServiceError::DuplicateId("1".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                BookServiceError::NotFound("1".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::LockPoisoned.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_store_failures_do_not_leak_details() {
        let err = ApiError::from(StoreError::InvalidData("secret row".into()));
        assert_eq!(err.public_message(), "internal storage error");
        assert!(!err.public_message().contains("secret"));
    }

    #[test]
    fn test_duplicate_from_store_maps_to_conflict() {
        let err = ApiError::from(StoreError::DuplicateId("7".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.public_message().contains('7'));
    }
}
