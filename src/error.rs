//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::form::{Flash, FormErrors};

/// Application error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchEntity = 4,
    BadValue = 5,
    InvalidForm = 6,
    BusinessRule = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Submitted form failed field constraints; carries the submitted values back
    #[error("Invalid form: {} field(s) rejected", .errors.fields().count())]
    Form {
        values: serde_json::Value,
        errors: FormErrors,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Rejected by a catalog rule; the message is the flash key shown to the user
    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

/// Rejected form, rendered back with its errors
#[derive(Serialize, utoipa::ToSchema)]
pub struct FormRejection {
    #[schema(value_type = Object)]
    pub values: serde_json::Value,
    #[schema(value_type = Object)]
    pub errors: FormErrors,
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormRejection>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut flash = None;
        let mut form = None;

        let (status, code, message) = match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg)
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntity, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Form { values, errors } => {
                form = Some(FormRejection { values, errors });
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::InvalidForm,
                    "The submitted form contains errors".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(key) => {
                flash = Some(Flash::danger(&key));
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BusinessRule, key)
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            flash,
            form,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
