//! Error codes attached to every logged failure.
//!
//! Clients only see the failure envelope; the codes exist so logs and
//! dashboards can group failures without parsing messages.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::DuplicateKey;
//! assert_eq!(code.as_str(), "DUPLICATE_KEY");
//! assert_eq!(code.code(), 2002);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    InvalidJson,
    InvalidQuery,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RequestTimeout,
    Conflict,
    TooManyRequests,
    PayloadTooLarge,

    // Database errors (2000-2999)
    DatabaseError,
    /// Unique index violation (MongoDB code 11000)
    DuplicateKey,
    DatabaseUnavailable,

    // Server errors (5000-5999)
    InternalError,
    SerdeJsonError,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::Conflict => "CONFLICT",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DuplicateKey => "DUPLICATE_KEY",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code for structured logs:
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    /// - 5000-5999: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidJson => 1002,
            Self::InvalidQuery => 1003,
            Self::BadRequest => 1004,
            Self::Unauthorized => 1005,
            Self::Forbidden => 1006,
            Self::NotFound => 1007,
            Self::RequestTimeout => 1008,
            Self::Conflict => 1009,
            Self::TooManyRequests => 1010,
            Self::PayloadTooLarge => 1011,

            Self::DatabaseError => 2001,
            Self::DuplicateKey => 2002,
            Self::DatabaseUnavailable => 2003,

            Self::InternalError => 5001,
            Self::SerdeJsonError => 5002,
            Self::ServiceUnavailable => 5003,
        }
    }

    /// Message used when the error carries none of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidJson => "Invalid JSON body",
            Self::InvalidQuery => "Invalid query string",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::NotFound => "Resource not found",
            Self::RequestTimeout => "Request timeout",
            Self::Conflict => "Resource already exists",
            Self::TooManyRequests => "Too many requests",
            Self::PayloadTooLarge => "Request body too large",
            Self::DatabaseError => "Internal server error",
            Self::DuplicateKey => "Duplicate value",
            Self::DatabaseUnavailable => "Database is unavailable",
            Self::InternalError => "Internal server error",
            Self::SerdeJsonError => "Internal server error",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
