use axum::{
    extract::{OriginalUri, Request},
    response::{IntoResponse, Response},
};

use super::AppError;

/// Fallback for unmatched routes and for verbs a route does not serve.
pub async fn not_found(request: Request) -> Response {
    // Nested routers see a stripped URI
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    AppError::NotFound(format!("Cannot {} {}", request.method(), path)).into_response()
}
