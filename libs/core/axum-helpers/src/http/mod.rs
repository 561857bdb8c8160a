//! HTTP middleware applied to every route.
//!
//! - CORS configuration
//! - Security headers
//! - Request ids
//! - Per-request timeout
//! - Per-client rate limiting
//! - Error logging with sensitive field masking

pub mod cors;
pub mod error_log;
pub mod rate_limit;
pub mod request_id;
pub mod security;
pub mod timeout;

pub use cors::cors_layer_from_env;
pub use error_log::{error_logging_middleware, mask_sensitive};
pub use rate_limit::{RateLimit, rate_limit_middleware};
pub use request_id::{REQUEST_ID_HEADER, make_request_span, propagate_request_id, set_request_id};
pub use security::security_headers;
pub use timeout::timeout_middleware;
