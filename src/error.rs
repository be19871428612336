//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type every component of the
//! service reports with. Stores and the access guard return typed `AppError`
//! variants; the HTTP boundary turns them into a status code and the JSON
//! envelope `{ "success": false, "message": ..., "errors"?: [...] }`.
//!
//! `NotFound` deliberately covers both "does not exist" and "exists but belongs
//! to someone else", so a non-owner can never confirm that a record exists.
//! `Forbidden` is only produced once a record has already been resolved and the
//! ownership check is a separate, later step.

use actix_web::{
    error::{BlockingError, JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::db::StoreError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears in the request.
    pub field: String,
    /// Human readable description of the rule that failed.
    pub message: String,
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400), with per-field detail.
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    /// Missing, malformed, tampered or expired bearer token (HTTP 401).
    Unauthenticated(String),
    /// Registration with an email that is already taken (HTTP 400).
    DuplicateEmail,
    /// Unknown email or wrong password; the two are never distinguished (HTTP 400).
    InvalidCredentials,
    /// Absent record, or a record the caller does not own (HTTP 404).
    NotFound(String),
    /// Resolved record whose owner is not the caller (HTTP 403).
    Forbidden(String),
    /// Storage failures and anything unexpected (HTTP 500).
    /// The wrapped message is logged, never sent to the client.
    ServerError(String),
}

impl AppError {
    /// Builds a validation error that is not tied to a particular field.
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation { message, errors } => {
                write!(f, "Validation Error: {} ({} field errors)", message, errors.len())
            }
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::DuplicateEmail => write!(f, "Email already exists"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::ServerError(msg) => write!(f, "Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers and middleware into the correct HTTP status codes and
/// JSON error envelopes.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation { message, errors } if !errors.is_empty() => {
                HttpResponse::build(status).json(json!({
                    "success": false,
                    "message": message,
                    "errors": errors,
                }))
            }
            AppError::Validation { message, .. } => HttpResponse::build(status).json(json!({
                "success": false,
                "message": message,
            })),
            AppError::ServerError(cause) => {
                log::error!("request failed: {}", cause);
                HttpResponse::build(status).json(json!({
                    "success": false,
                    "message": "Server Error",
                }))
            }
            AppError::Unauthenticated(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg) => HttpResponse::build(status).json(json!({
                "success": false,
                "message": msg,
            })),
            AppError::DuplicateEmail | AppError::InvalidCredentials => {
                HttpResponse::build(status).json(json!({
                    "success": false,
                    "message": self.to_string(),
                }))
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// keeping one entry per failed rule, ordered by field name.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let mut errors: Vec<FieldError> = error
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| FieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation {
            message: "Validation failed".into(),
            errors,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            other => AppError::ServerError(other.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::ServerError(format!("password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::ServerError(format!("blocking task failed: {}", error))
    }
}

/// Error handler for `web::JsonConfig`: unreadable or incomplete bodies are
/// reported in the same envelope as any other validation failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(inner) => format!("Invalid request body: {}", inner),
        JsonPayloadError::ContentType => "Expected a JSON request body".to_string(),
        other => format!("Invalid request body: {}", other),
    };
    AppError::bad_request(message).into()
}

/// Error handler for `web::QueryConfig`: a query string that cannot be read
/// at all still gets the JSON envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request(format!("Invalid query string: {}", err)).into()
}

/// Error handler for `web::PathConfig`: identifiers that do not parse are a
/// client error, not a missing route.
pub fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("Invalid id").into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    #[test]
    fn test_error_responses() {
        let error = AppError::bad_request("Invalid id");
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Unauthenticated("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        assert_eq!(AppError::DuplicateEmail.error_response().status(), 400);
        assert_eq!(AppError::InvalidCredentials.error_response().status(), 400);

        let error = AppError::NotFound("Project not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Forbidden("Not authorized".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::ServerError("connection reset".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_web::test]
    async fn test_server_error_hides_cause() {
        let response = AppError::ServerError("password for db is hunter2".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Server Error");
        assert!(!String::from_utf8_lossy(&body).contains("hunter2"));
    }

    #[actix_web::test]
    async fn test_validation_envelope_lists_fields() {
        let err: AppError = Sample { title: String::new() }.validate().unwrap_err().into();
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "title");
        assert_eq!(json["errors"][0]["message"], "Title is required");
    }

    #[test]
    fn test_store_duplicate_maps_to_duplicate_email() {
        let err: AppError = StoreError::DuplicateEmail.into();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[actix_web::test]
    async fn test_query_errors_use_envelope() {
        let err = actix_web::web::Query::<std::collections::HashMap<String, u32>>::from_query("page=abc")
            .unwrap_err();
        let req = actix_web::test::TestRequest::default().to_http_request();
        let response = query_error_handler(err, &req).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }
}
