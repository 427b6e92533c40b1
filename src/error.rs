//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. Each variant is one kind in the failure taxonomy (validation,
//! conflict, not-found, unauthorized, storage) and maps to a fixed HTTP
//! status at the request boundary.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can
//! return `Result<impl Responder, AppError>` and rely on automatic
//! conversion into JSON error responses. `From` implementations for
//! `sqlx::Error`, `validator::ValidationErrors` and `bcrypt::BcryptError`
//! make the `?` operator work at the persistence and hashing seams.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Failures are raised at the point of detection and propagate unchanged up
/// to the request boundary; there are no retries anywhere in this core.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failure: bad password, bad/expired/malformed token,
    /// or a resolver lookup that found no account (HTTP 401). The
    /// underlying causes are deliberately not distinguished to the caller.
    Unauthorized(String),
    /// Malformed input caught before it reaches persistence, such as a
    /// password-policy violation or a password confirmation mismatch
    /// (HTTP 422 Unprocessable Entity).
    Validation(String),
    /// A uniqueness rejection, e.g. registering a username that is already
    /// taken (HTTP 409).
    Conflict(String),
    /// A referenced identity or task does not exist (HTTP 404).
    NotFound(String),
    /// An error originating from database operations (HTTP 500).
    Database(String),
    /// An unexpected server-side error (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This is the single place where the taxonomy is mapped to
/// externally-visible statuses.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Validation(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic internal server errors.
            AppError::Database(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`, everything else
/// becomes `AppError::Database`. Unique-constraint violations are handled
/// closer to the query, where the conflicting resource is known.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// preserving the aggregated per-field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// This only fires on the hashing path; verification swallows malformed
/// hashes and returns `false` instead (see `auth::password`).
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
