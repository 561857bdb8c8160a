use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{
    RateLimit, cors_layer_from_env, error_logging_middleware, make_request_span,
    propagate_request_id, rate_limit_middleware, security_headers, set_request_id,
    timeout_middleware,
};
use axum::{Json, Router, middleware, routing::get};
use core_config::http::HttpConfig;
use core_config::server::ServerConfig;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::openapi::OpenApi;

/// Starts the server and stops on SIGINT/SIGTERM.
///
/// # Errors
/// Fails when the listener cannot bind or the server errors while running.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    })?;

    Ok(())
}

/// Wraps the API routes with the cross-cutting middleware stack.
///
/// - `apis` is nested under `/api`, behind the rate limiter and the
///   request timeout
/// - `GET /api-docs/openapi.json` serves `openapi`
/// - unmatched routes answer with a 404 failure envelope
/// - every response gets a request id, security headers, CORS and
///   compression; error responses are logged with the masked body
///
/// Health endpoints are merged by the caller via `health_router()`.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is set but invalid.
pub async fn create_router(apis: Router, openapi: OpenApi, http: &HttpConfig) -> io::Result<Router> {
    let cors_layer = cors_layer_from_env()?;

    let rate_limit = RateLimit::new(http.rate_limit_requests, http.rate_limit_window());
    spawn_rate_limit_pruning(rate_limit.clone(), http.rate_limit_window());

    let apis = apis
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn_with_state(
            http.request_timeout(),
            timeout_middleware,
        ))
        .layer(middleware::from_fn_with_state(rate_limit, rate_limit_middleware));

    let router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .nest("/api", apis)
        .fallback(not_found)
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<axum::body::Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(propagate_request_id())
        .layer(set_request_id())
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

fn spawn_rate_limit_pruning(rate_limit: RateLimit, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            rate_limit.prune();
        }
    });
}

/// Server with coordinated shutdown: on signal, stops accepting requests,
/// drains in-flight ones and runs `cleanup` bounded by `shutdown_timeout`.
///
/// ```ignore
/// let cleanup = async move { client.shutdown().await };
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let server_coordinator = coordinator.clone();
    let serve_result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { server_coordinator.wait_for_shutdown().await })
    .await
    .inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    });

    // Make sure cleanup runs even if the server stopped on its own
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::post,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use utoipa::openapi::OpenApiBuilder;

    async fn router() -> Router {
        let apis = Router::new().route("/things", post(|| async { "created" }));
        let http = HttpConfig {
            rate_limit_requests: 3,
            ..HttpConfig::default()
        };
        create_router(apis, OpenApiBuilder::new().build(), &http)
            .await
            .unwrap()
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route_gets_failure_envelope() {
        let response = router()
            .await
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Cannot GET /nope");
    }

    #[tokio::test]
    async fn test_wrong_method_gets_failure_envelope() {
        let response = router()
            .await
            .oneshot(Request::get("/api/things").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["message"], "Cannot GET /api/things");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = router()
            .await
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(json(response).await["openapi"].is_string());
    }

    #[tokio::test]
    async fn test_api_routes_are_rate_limited() {
        let app = router().await;
        let call = || {
            Request::post("/api/things")
                .header("x-forwarded-for", "198.51.100.4")
                .body(Body::empty())
                .unwrap()
        };

        for _ in 0..3 {
            assert_eq!(app.clone().oneshot(call()).await.unwrap().status(), StatusCode::OK);
        }
        assert_eq!(
            app.clone().oneshot(call()).await.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
