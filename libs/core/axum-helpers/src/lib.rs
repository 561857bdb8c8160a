//! # Axum Helpers
//!
//! Building blocks shared by the HTTP services.
//!
//! ## Modules
//!
//! - **[`errors`]**: `AppError` and its mapping to status codes and failure envelopes
//! - **[`response`]**: the success / failure envelope and pagination metadata
//! - **[`extractors`]**: validated JSON body and query extractors
//! - **[`http`]**: middleware (CORS, security headers, request ids, timeout, rate limit, error logging)
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::{app_info, http::HttpConfig, server::ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router(api_routes, openapi, &HttpConfig::default())
//!         .await?
//!         .merge(health_router(app_info!()));
//!
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorContext};

// Re-export envelope types
pub use response::{ApiResponse, DEFAULT_SUCCESS_MESSAGE, Message, PaginationMeta};

// Re-export extractors
pub use extractors::{ValidatedJson, ValidatedQuery};
