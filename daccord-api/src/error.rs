/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. `ApiError` renders as the standard
/// failure envelope:
///
/// ```json
/// { "success": false, "error": "Username must be 3-20 characters", "details": [...] }
/// ```
///
/// Internal errors are logged here and replaced by a generic message, so no
/// database or hashing detail ever reaches a client.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use daccord_shared::auth::jwt::JwtError;
use daccord_shared::auth::middleware::AuthError;
use daccord_shared::auth::password::PasswordError;
use daccord_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::Envelope;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// One failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Request field name as the client sent it (camelCase)
    pub field: String,

    pub message: String,
}

/// Unified API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field validation failed (400)
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Absent, or present but not owned by the caller (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Anything else (500); the message is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error, details) = match self {
            ApiError::Validation(details) => {
                let first = details
                    .first()
                    .map(|d| d.message.clone())
                    .unwrap_or_else(|| "Validation failed".to_string());
                (first, Some(details))
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("Internal server error".to_string(), None)
            }
        };

        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            error: Some(error),
            message: None,
            details,
        };

        (status, Json(body)).into_response()
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flattens validator output into field errors sorted by field name
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = camel_case(&field.to_string());
                errs.iter()
                    .map(|e| FieldError {
                        field: field.clone(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid {}", field)),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(details)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::Conflict("Resource already exists".to_string()),
            StoreError::NotFound(what) => ApiError::not_found(&what),
            StoreError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::unauthorized()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Only reachable when issuing a token; verification failures never surface
/// as errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Internal(format!("Token operation failed: {}", err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
