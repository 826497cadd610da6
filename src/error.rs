// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::DatabaseError;

/// Authentication/authorization failure subtypes. Each maps to a stable
/// machine-readable code so clients and tests can branch on the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on the request
    MissingToken,
    /// Signature or expiry check failed
    InvalidToken,
    /// Username unknown or password mismatch
    InvalidCredentials,
    /// Token is valid but its identity no longer resolves to a stored user
    UnknownIdentity,
    /// Identity resolved but its role is not in the allow-list
    Forbidden,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UnknownIdentity => "unknown_identity",
            AuthError::Forbidden => "forbidden",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token is required",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::UnknownIdentity => "User not found",
            AuthError::Forbidden => "Access denied",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Forbidden => 403,
            _ => 401,
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized / 403 Forbidden
    Auth(AuthError),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Validation { .. } => 400,
            ApiError::Auth(auth) => auth.status_code(),
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Internal(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Auth(auth) => auth.message(),
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Auth(auth) => auth.code(),
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::Validation {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            body["field_errors"] = json!(field_errors);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    pub fn missing_token() -> Self {
        ApiError::Auth(AuthError::MissingToken)
    }

    pub fn invalid_token() -> Self {
        ApiError::Auth(AuthError::InvalidToken)
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Auth(AuthError::InvalidCredentials)
    }

    pub fn unknown_identity() -> Self {
        ApiError::Auth(AuthError::UnknownIdentity)
    }

    pub fn forbidden() -> Self {
        ApiError::Auth(AuthError::Forbidden)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return a generic message
                tracing::error!("database error: {}", sqlx_err);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(DatabaseError::Sqlx(err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_subtypes_map_to_expected_statuses() {
        assert_eq!(ApiError::missing_token().status_code(), 401);
        assert_eq!(ApiError::invalid_token().status_code(), 401);
        assert_eq!(ApiError::invalid_credentials().status_code(), 401);
        assert_eq!(ApiError::unknown_identity().status_code(), 401);
        assert_eq!(ApiError::forbidden().status_code(), 403);
    }

    #[test]
    fn auth_subtypes_carry_stable_codes() {
        assert_eq!(ApiError::invalid_credentials().error_code(), "invalid_credentials");
        assert_eq!(ApiError::missing_token().error_code(), "missing_token");
        assert_eq!(ApiError::invalid_token().error_code(), "invalid_token");
        assert_eq!(ApiError::unknown_identity().error_code(), "unknown_identity");
        assert_eq!(ApiError::forbidden().error_code(), "forbidden");
    }

    #[test]
    fn validation_error_includes_field_detail() {
        let mut fields = HashMap::new();
        fields.insert("username".to_string(), "Username is required".to_string());
        let err = ApiError::validation("Invalid input", Some(fields));

        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["field_errors"]["username"], "Username is required");
    }

    #[test]
    fn store_errors_never_leak_detail() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("pool"));
    }
}
