pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use crate::response::{ApiResponse, Message};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// MongoDB server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Seconds a rate-limited client is told to wait when no better figure is known
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

static DUP_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"dup key: \{\s*"?([\w.$]+)"?\s*:\s*"?(.*?)"?\s*\}"#)
        .expect("duplicate key pattern is valid")
});

/// Normalized outcome of a failed request, stored in the response
/// extensions so the error logging middleware can report it.
#[derive(Clone, Debug)]
pub struct ErrorContext {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

/// Every failure that can reach the HTTP boundary.
///
/// Converting into a response picks the status, builds the failure
/// envelope and logs the source; sources never reach the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Request Timeout")]
    RequestTimeout,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload Too Large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Too Many Requests (retry after {retry_after}s)")]
    TooManyRequests { retry_after: u64 },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody {
    #[serde(flatten)]
    envelope: ApiResponse<()>,
    retry_after: u64,
}

impl AppError {
    /// Status, code and client-facing message for this error.
    pub fn normalize(&self) -> (StatusCode, ErrorCode, Message) {
        match self {
            AppError::JsonExtractorRejection(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidJson,
                Message::Text(e.body_text()),
            ),
            AppError::QueryExtractorRejection(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidQuery,
                Message::Text(e.body_text()),
            ),
            AppError::ValidationError(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                Message::List(validation_messages(e)),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                Message::Text(msg.clone()),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                Message::Text(msg.clone()),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorCode::Forbidden,
                Message::Text(msg.clone()),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                Message::Text(msg.clone()),
            ),
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorCode::RequestTimeout,
                ErrorCode::RequestTimeout.default_message().into(),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorCode::Conflict,
                Message::Text(msg.clone()),
            ),
            AppError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorCode::PayloadTooLarge,
                ErrorCode::PayloadTooLarge.default_message().into(),
            ),
            AppError::TooManyRequests { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorCode::TooManyRequests,
                ErrorCode::TooManyRequests.default_message().into(),
            ),
            AppError::Database(e) => match duplicate_key(e) {
                Some(dup) => (
                    StatusCode::CONFLICT,
                    ErrorCode::DuplicateKey,
                    Message::Text(dup.message()),
                ),
                None => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    ErrorCode::DatabaseError.default_message().into(),
                ),
            },
            AppError::SerdeJson(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::SerdeJsonError,
                ErrorCode::SerdeJsonError.default_message().into(),
            ),
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                ErrorCode::InternalError.default_message().into(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                Message::Text(msg.clone()),
            ),
        }
    }

    fn log_source(&self, code: ErrorCode) {
        match self {
            AppError::Database(e) if code == ErrorCode::DatabaseError => {
                tracing::error!(error_code = code.code(), error = ?e, "Database error");
            }
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = code.code(), error = ?e, "JSON serialization error");
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
            }
            other => {
                tracing::debug!(error_code = code.code(), "{}", other);
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.normalize();
        self.log_source(code);

        let context = ErrorContext {
            status,
            code,
            message: message.joined(),
        };

        let mut response = match self {
            AppError::TooManyRequests { retry_after } => {
                let body = RateLimitedBody {
                    envelope: ApiResponse::fail(message),
                    retry_after,
                };
                let mut response = (status, Json(body)).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            _ => (status, ApiResponse::<()>::fail(message)).into_response(),
        };

        response.extensions_mut().insert(context);
        response
    }
}

/// Field and value named in a duplicate key error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub field: String,
    pub value: String,
}

impl DuplicateKey {
    pub fn message(&self) -> String {
        format!("Duplicate value for {}: \"{}\"", self.field, self.value)
    }
}

/// Extract the offending field and value from a MongoDB duplicate key error.
///
/// Returns `None` for any other error. When the server message cannot be
/// parsed, field and value fall back to `"key"` and `"unknown"`.
pub fn duplicate_key(error: &mongodb::error::Error) -> Option<DuplicateKey> {
    let message = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
            e.message.as_str()
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => e.message.as_str(),
        _ => return None,
    };

    Some(parse_duplicate_key_message(message))
}

/// Parse `... dup key: { slug: "nike" }` into its field and value.
pub fn parse_duplicate_key_message(message: &str) -> DuplicateKey {
    match DUP_KEY_RE.captures(message) {
        Some(caps) => DuplicateKey {
            field: caps[1].to_string(),
            value: caps[2].to_string(),
        },
        None => DuplicateKey {
            field: "key".to_string(),
            value: "unknown".to_string(),
        },
    }
}

/// One `"<path>: <message>"` entry per failed constraint, sorted.
///
/// Nested structs are addressed as `image.url`, list items as `variants[0].sku`.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect_validation_messages(errors, None, &mut out);
    out.sort();
    out
}

fn collect_validation_messages(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<String>,
) {
    for (field, kind) in errors.errors() {
        let path = match (prefix, field.as_ref()) {
            (Some(prefix), "__all__") => prefix.to_string(),
            (Some(prefix), field) => format!("{prefix}.{field}"),
            (None, field) => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    out.push(format!("{path}: {}", describe(error)));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_messages(inner, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_messages(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> Cow<'static, str> {
    if let Some(message) = &error.message {
        return message.clone();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "email" => "must be a valid email".into(),
        "url" => "must be a valid URL".into(),
        "required" => "is required".into(),
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}").into(),
            (Some(min), None) => format!("length must be at least {min}").into(),
            (None, Some(max)) => format!("length must be at most {max}").into(),
            (None, None) => "has an invalid length".into(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}").into(),
            (Some(min), None) => format!("must be at least {min}").into(),
            (None, Some(max)) => format!("must be at most {max}").into(),
            (None, None) => "is out of range".into(),
        },
        code => format!("failed {code} validation").into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;
    use validator::Validate;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Validate)]
    struct Variant {
        #[validate(range(min = 0.0))]
        price: f64,
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(nested)]
        variants: Vec<Variant>,
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let response = AppError::NotFound("Brand with id 42 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let context = response.extensions().get::<ErrorContext>().cloned().unwrap();
        assert_eq!(context.message, "Brand with id 42 not found");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Brand with id 42 not found");
        assert!(body.get("data").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::RequestTimeout, StatusCode::REQUEST_TIMEOUT),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::PayloadTooLarge { limit: 16 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AppError::InternalServerError("socket closed".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let response = AppError::InternalServerError("pool exhausted at 10.0.0.3".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_timeout_message() {
        let body = body_json(AppError::RequestTimeout.into_response()).await;
        assert_eq!(body["message"], "Request timeout");
    }

    #[tokio::test]
    async fn test_too_many_requests_carries_retry_after() {
        let response = AppError::TooManyRequests { retry_after: 60 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["retryAfter"], 60);
        assert_eq!(body["message"], "Too many requests");
    }

    #[tokio::test]
    async fn test_validation_errors_become_sorted_list() {
        let payload = Payload {
            name: String::new(),
            email: "nope".into(),
            variants: vec![Variant { price: -1.0 }],
        };
        let errors = payload.validate().unwrap_err();

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let messages: Vec<String> = serde_json::from_value(body["message"].clone()).unwrap();
        assert_eq!(
            messages,
            vec![
                "email: must be a valid email".to_string(),
                "name: length must be between 1 and 10".to_string(),
                "variants[0].price: must be at least 0.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_duplicate_key_message() {
        let dup = parse_duplicate_key_message(
            r#"E11000 duplicate key error collection: crm.brands index: slug_1 dup key: { slug: "nike" }"#,
        );
        assert_eq!(dup.field, "slug");
        assert_eq!(dup.value, "nike");
        assert_eq!(dup.message(), r#"Duplicate value for slug: "nike""#);
    }

    #[test]
    fn test_parse_duplicate_key_numeric_and_quoted_field() {
        let dup = parse_duplicate_key_message(r#"dup key: { "code": 1042 }"#);
        assert_eq!(dup.field, "code");
        assert_eq!(dup.value, "1042");
    }

    #[test]
    fn test_parse_duplicate_key_unparseable() {
        let dup = parse_duplicate_key_message("E11000 duplicate key error");
        assert_eq!(dup.field, "key");
        assert_eq!(dup.value, "unknown");
    }
}
