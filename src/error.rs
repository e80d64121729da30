//!
//! # Error Handling
//!
//! This module defines `AppError`, the error type returned by every handler.
//! The API only ever surfaces three outcomes to clients: a bad request (400)
//! carrying a short message, a not-found (404) with an empty body, and an
//! unauthorized response (401) with an empty body.
//!
//! `AppError` implements `actix_web::error::ResponseError`, and the `From`
//! implementations below let handlers use `?` on store, validation, hashing
//! and token errors directly.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use crate::db::StoreError;

/// Represents all errors a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request was malformed, failed validation, or the store rejected it (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The resource does not exist, belongs to someone else, or its id is malformed (HTTP 404).
    #[error("Not Found")]
    NotFound,
    /// No valid auth token was presented (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound => HttpResponse::NotFound().finish(),
            AppError::Unauthorized => HttpResponse::Unauthorized().finish(),
        }
    }
}

/// Store failures never reach the client as server errors; a duplicate email
/// and a lost connection both come back as 400.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::BadRequest("Email already registered".into()),
            other => {
                log::debug!("store error: {}", other);
                AppError::BadRequest("Request could not be completed".into())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("rejected token: {}", error);
        AppError::Unauthorized
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::BadRequest(format!("Password processing failed: {}", error))
    }
}
