//! Generic CRUD for MongoDB-backed resources
//!
//! Every resource gets the same five endpoints, the same envelope and the
//! same error mapping; only the entity, its DTOs and a few hooks differ.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, envelope, update body checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Not Found with resource name and id
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Resource   │  ← Entity, DTOs, hooks, indexes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crud::{MongoRepository, ResourceService, handlers};
//!
//! let repository = MongoRepository::<Brand>::new(&db);
//! repository.ensure_indexes().await?;
//! let router = handlers::router(ResourceService::new(repository), 25);
//! ```

pub mod clean;
pub mod error;
pub mod handlers;
pub mod mongodb;
pub mod openapi;
pub mod pagination;
pub mod repository;
pub mod resource;
pub mod service;

// Re-export commonly used types
pub use crate::mongodb::MongoRepository;
pub use clean::clean_update;
pub use error::{CrudError, CrudResult};
pub use handlers::router;
pub use openapi::resource_openapi;
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PaginatedResult, PaginationQuery};
pub use repository::Repository;
pub use resource::{Resource, unique_index};
pub use service::{RemovedId, ResourceService};
