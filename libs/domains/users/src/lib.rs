//! Users Domain
//!
//! Accounts served through the generic [`crud`] layer. Emails are
//! normalised on the way in and passwords are hashed with Argon2 before
//! the document reaches the repository; the hash is never part of
//! [`User`], so no response can carry it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crud::{MongoRepository, ResourceService};
//! use domain_users::User;
//!
//! let repository = MongoRepository::<User>::new(&db);
//! repository.ensure_indexes().await?;
//! let users = crud::router(ResourceService::new(repository), 25);
//! ```

pub mod password;
pub mod user;

use utoipa::openapi::OpenApi;

// Re-export commonly used types
pub use password::{hash_password, verify_password};
pub use user::{CreateUser, UpdateUser, User};

/// OpenAPI paths and schemas for the users resource under `prefix`.
pub fn openapi(prefix: &str) -> OpenApi {
    crud::resource_openapi::<User>(prefix)
}
