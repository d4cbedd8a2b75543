//! Application error type and HTTP response conversion.
//!
//! Every fallible operation in the API returns [`AppError`]. An error carries
//! an [`ErrorKind`] that classifies it, the HTTP status it renders with, and
//! the underlying [`anyhow::Error`] holding the human-readable message.
//!
//! Domain conditions (`NotFound`, `Forbidden`, `Unauthenticated`) are built
//! where they are detected and propagated unchanged with `?`. Failures from
//! collaborators are converted explicitly into `InternalFailure`, keeping the
//! original message for diagnostics.
//!
//! # Response body
//!
//! ```json
//! { "error": "Product not found" }
//! ```

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

use crate::file_storage::StorageError;

/// Classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, malformed, invalid or expired credential.
    Unauthenticated,
    /// Valid credential without the required role or ownership.
    Forbidden,
    /// The requested entity does not exist.
    NotFound,
    /// Malformed input: bad payload, bad file, duplicate key.
    ValidationFailure,
    /// Unexpected failure in a collaborator (storage, hashing, encoding).
    InternalFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ValidationFailure => "validation_failure",
            Self::InternalFailure => "internal_failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            status,
            error: err.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Unauthenticated,
            StatusCode::UNAUTHORIZED,
            message_error(message),
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Forbidden,
            StatusCode::FORBIDDEN,
            message_error(message),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            StatusCode::NOT_FOUND,
            message_error(message),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ValidationFailure,
            StatusCode::BAD_REQUEST,
            message_error(message),
        )
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ValidationFailure,
            StatusCode::UNPROCESSABLE_ENTITY,
            message_error(message),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(message_error(message))
    }

    /// Wraps an unexpected failure, preserving its message.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            ErrorKind::InternalFailure,
            StatusCode::INTERNAL_SERVER_ERROR,
            err,
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

/// The response carries its [`ErrorKind`] as an extension so the request log
/// can report it.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::InternalFailure {
            tracing::error!(error = %self.error, "Internal failure");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        let mut response = (self.status, body).into_response();
        response.extensions_mut().insert(self.kind);
        response
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::unprocessable(format_validation_errors(&errors))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFileSize { .. }
            | StorageError::InvalidMimeType { .. }
            | StorageError::InvalidKey(_) => AppError::bad_request(err.to_string()),
            StorageError::IoError(e) => AppError::internal(e),
        }
    }
}

fn message_error(message: impl Into<String>) -> Error {
    let message: String = message.into();
    Error::msg(message)
}

/// Flattens field errors into a single comma-separated message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
