//! Error handler for capabnb.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("error parsing form data")]
    Multipart(#[from] MultipartError),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Access token required")]
    AccessRequired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("token signing failed")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("internal server error, {details}")]
    Internal { details: String },
}

impl From<crate::crypto::CryptoError> for ServerError {
    fn from(err: crate::crypto::CryptoError) -> Self {
        match err {
            crate::crypto::CryptoError::Mismatch => Self::InvalidCredentials,
            crate::crypto::CryptoError::Argon2(details) => {
                Self::Internal { details }
            },
        }
    }
}

/// Error body returned to callers, one schema for every route.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip)]
    status: StatusCode,
}

impl ResponseError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            status,
        }
    }

    /// Attach per-field details from a validation failure.
    fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = match &self {
            ServerError::Validation(validation_errors) => ResponseError::new(
                StatusCode::BAD_REQUEST,
                "There were validation errors with your request.",
            )
            .errors(validation_errors),

            ServerError::Axum(err) => {
                ResponseError::new(StatusCode::BAD_REQUEST, err.body_text())
            },

            ServerError::Multipart(err) => {
                ResponseError::new(StatusCode::BAD_REQUEST, err.body_text())
            },

            ServerError::Sql(SQLxError::RowNotFound) => {
                ResponseError::new(StatusCode::NOT_FOUND, "Not found")
            },

            ServerError::Sql(err) => match err.as_database_error() {
                Some(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                    ResponseError::new(
                        StatusCode::BAD_REQUEST,
                        "Resource already exists",
                    )
                },
                _ => {
                    tracing::error!(error = %err, "sql request failed");
                    ResponseError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                    )
                },
            },

            ServerError::NotFound(entity) => ResponseError::new(
                StatusCode::NOT_FOUND,
                format!("{entity} not found"),
            ),

            ServerError::AccessRequired => ResponseError::new(
                StatusCode::UNAUTHORIZED,
                self.to_string(),
            ),

            ServerError::InvalidToken => {
                ResponseError::new(StatusCode::FORBIDDEN, self.to_string())
            },

            ServerError::InvalidCredentials => ResponseError::new(
                StatusCode::UNAUTHORIZED,
                self.to_string(),
            ),

            ServerError::Jwt(err) => {
                tracing::error!(error = %err, "token signing failed");
                ResponseError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                )
            },

            ServerError::Internal { details } => {
                tracing::error!(%details, "server returned 500 status");
                ResponseError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                )
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({ "message": "Internal server error" })
                .to_string()
                .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServerError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_auth_errors_fail_closed() {
        assert_eq!(
            status_of(ServerError::AccessRequired),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ServerError::InvalidToken), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(ServerError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_mapping() {
        assert_eq!(
            status_of(ServerError::NotFound("Booking")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServerError::Sql(SQLxError::RowNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "phone",
            validator::ValidationError::new("phone")
                .with_message("Phone must be exactly 8 digits.".into()),
        );
        assert_eq!(
            status_of(ServerError::Validation(errors)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let response = ServerError::Internal {
            details: "pool exhausted on shard 3".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
