//! API routes module
//!
//! Every resource is served by the generic CRUD router over its own
//! MongoDB collection.

pub mod health;

use axum::Router;
use core_proc_macros::ApiResource;
use crud::{CrudResult, MongoRepository, Resource, ResourceService};
use domain_catalog::{Brand, Category, Product, ProductType};
use domain_users::User;
use mongodb::Database;

use crate::state::AppContext;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppContext) -> Router {
    let limit = state.config.http.default_page_limit;

    Router::new()
        .nest(Brand::URL, resource::<Brand>(&state.db, limit))
        .nest(Category::URL, resource::<Category>(&state.db, limit))
        .nest(ProductType::URL, resource::<ProductType>(&state.db, limit))
        .nest(Product::URL, resource::<Product>(&state.db, limit))
        .nest(User::URL, resource::<User>(&state.db, limit))
        .merge(health::router(state.clone()))
}

fn resource<T: Resource>(db: &Database, default_limit: u64) -> Router {
    crud::router(ResourceService::new(MongoRepository::<T>::new(db)), default_limit)
}

/// Creates the unique indexes of every collection.
pub async fn init_indexes(db: &Database) -> CrudResult<()> {
    MongoRepository::<Brand>::new(db).ensure_indexes().await?;
    MongoRepository::<Category>::new(db).ensure_indexes().await?;
    MongoRepository::<ProductType>::new(db).ensure_indexes().await?;
    MongoRepository::<Product>::new(db).ensure_indexes().await?;
    MongoRepository::<User>::new(db).ensure_indexes().await?;
    Ok(())
}
