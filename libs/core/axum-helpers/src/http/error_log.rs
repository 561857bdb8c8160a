use axum::{
    body::{Body, to_bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::errors::{AppError, ErrorContext};

/// Bodies larger than this are rejected with 413 before reaching handlers.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const MASKED_FIELDS: [&str; 2] = ["password", "newPassword"];
const MASK: &str = "***";

/// Replaces top-level sensitive fields of a JSON object with `"***"`.
pub fn mask_sensitive(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        for field in MASKED_FIELDS {
            if let Some(value) = map.get_mut(field) {
                *value = Value::String(MASK.to_string());
            }
        }
    }
    body
}

/// Whether reading the body stopped at the size limit.
fn is_length_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Logs `"<METHOD> <path> -> <message>"` with the masked request body for
/// every response produced by [`AppError`].
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            tracing::warn!("{} {} -> request body exceeds {} bytes", method, path, MAX_BODY_BYTES);
            return AppError::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            }
            .into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "{} {} -> failed to read request body", method, path);
            return AppError::BadRequest("Request body could not be read".to_string())
                .into_response();
        }
    };
    let request = Request::from_parts(parts, Body::from(bytes.clone()));

    let response = next.run(request).await;

    if let Some(context) = response.extensions().get::<ErrorContext>() {
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice::<Value>(&bytes)
                .map(mask_sensitive)
                .unwrap_or_else(|_| Value::String("<non-JSON body>".to_string()))
        };

        if context.status.is_server_error() {
            tracing::error!(
                status = context.status.as_u16(),
                error_code = context.code.code(),
                body = %body,
                "{} {} -> {}",
                method,
                path,
                context.message
            );
        } else {
            tracing::warn!(
                status = context.status.as_u16(),
                error_code = context.code.code(),
                body = %body,
                "{} {} -> {}",
                method,
                path,
                context.message
            );
        }
    }

    response
}
