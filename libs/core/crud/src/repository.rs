use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::CrudResult;
use crate::pagination::{PaginatedResult, PaginationQuery};
use crate::resource::Resource;

/// Storage for one resource collection.
///
/// Ids are taken as strings. An id that is not a valid ObjectId behaves
/// like an id with no matching document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository<T: Resource>: Send + Sync {
    /// Inserts `document` with a fresh id and timestamps.
    async fn create(&self, document: Document) -> CrudResult<T>;

    /// Reads one page, ordered by id, together with the total count.
    async fn find(&self, query: PaginationQuery) -> CrudResult<PaginatedResult<T>>;

    async fn find_by_id(&self, id: &str) -> CrudResult<Option<T>>;

    /// Merges `changes` into the stored document and returns the result.
    async fn update(&self, id: &str, changes: Document) -> CrudResult<Option<T>>;

    /// `true` when a document was deleted.
    async fn remove(&self, id: &str) -> CrudResult<bool>;
}
