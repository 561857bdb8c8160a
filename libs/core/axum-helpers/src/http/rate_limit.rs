//! Per-client fixed-window request throttling.
//!
//! Clients are keyed by the first `X-Forwarded-For` entry, then by the peer
//! address from `ConnectInfo`; requests with neither share one bucket.
//! A client gets `requests` calls per window; the window starts with its
//! first call and the count resets when it ends.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::AppError;

const FORWARDED_FOR: &str = "x-forwarded-for";
const SHARED_KEY: &str = "global";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Shared keyed limiter allowing `requests` per `window` for each client.
#[derive(Clone)]
pub struct RateLimit {
    windows: Arc<DashMap<String, Window>>,
    requests: u32,
    window: Duration,
}

impl RateLimit {
    pub fn new(requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            requests: requests.max(1),
            window: window.max(Duration::from_secs(1)),
        }
    }

    /// Counts one call for `key`; a rejected call reports the whole seconds
    /// left until the client's window resets.
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count < self.requests {
            entry.count += 1;
            return Ok(());
        }

        let remaining = self.window.saturating_sub(now.duration_since(entry.started));
        Err(AppError::TooManyRequests {
            retry_after: retry_after_secs(remaining),
        })
    }

    /// Drop windows that have expired.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }
}

fn retry_after_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| SHARED_KEY.to_owned())
}

pub async fn rate_limit_middleware(
    State(limit): State<RateLimit>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limit.check(&key) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(client = %key, "Rate limit exceeded");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(limit: RateLimit) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limit, rate_limit_middleware))
    }

    fn request_from(ip: &str) -> Request {
        Request::get("/")
            .header(FORWARDED_FOR, ip)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_eleventh_request_in_window_is_rejected() {
        let router = app(RateLimit::new(10, Duration::from_secs(60)));

        for _ in 0..10 {
            let response = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["retryAfter"], 60);
        assert_eq!(body["success"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_is_fixed_not_refilled() {
        let router = app(RateLimit::new(10, Duration::from_secs(60)));

        for _ in 0..10 {
            let response = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Well past one tenth of the window, still inside it
        tokio::time::advance(Duration::from_millis(6_100)).await;
        let response = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "54");

        tokio::time::advance(Duration::from_secs(54)).await;
        let response = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_drops_expired_windows() {
        let limit = RateLimit::new(1, Duration::from_secs(60));
        limit.check("10.0.0.1").unwrap();
        limit.prune();
        assert_eq!(limit.windows.len(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        limit.prune();
        assert!(limit.windows.is_empty());
        assert!(limit.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(53_900)), 54);
        assert_eq!(retry_after_secs(Duration::from_secs(60)), 60);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn test_clients_are_limited_independently() {
        let router = app(RateLimit::new(1, Duration::from_secs(60)));

        let first = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
        let second = router.clone().oneshot(request_from("10.0.0.2, 172.16.0.1")).await.unwrap();
        let repeat = router.clone().oneshot(request_from("10.0.0.1")).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_client_key_fallbacks() {
        let forwarded = request_from(" 203.0.113.9 , 10.0.0.1");
        assert_eq!(client_key(&forwarded), "203.0.113.9");

        let mut direct = Request::get("/").body(Body::empty()).unwrap();
        direct
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 4242))));
        assert_eq!(client_key(&direct), "192.0.2.7");

        let anonymous = Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(client_key(&anonymous), SHARED_KEY);
    }
}
