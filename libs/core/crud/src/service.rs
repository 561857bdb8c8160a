//! Resource service - lookups that fail with a named Not Found

use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::Document;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::clean::clean_update;
use crate::error::{CrudError, CrudResult};
use crate::pagination::{PaginatedResult, PaginationQuery};
use crate::repository::Repository;
use crate::resource::Resource;

/// Payload returned by a successful remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RemovedId {
    pub id: String,
}

/// Generic service in front of a [`Repository`].
///
/// Turns missing documents into [`CrudError::NotFound`] carrying the
/// resource display name and the requested id.
pub struct ResourceService<T: Resource, R: Repository<T>> {
    repository: Arc<R>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource, R: Repository<T>> ResourceService<T, R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            _resource: PhantomData,
        }
    }

    #[instrument(skip(self, document), fields(resource = T::NAME))]
    pub async fn create(&self, document: Document) -> CrudResult<T> {
        self.repository.create(document).await
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn find(&self, query: PaginationQuery) -> CrudResult<PaginatedResult<T>> {
        self.repository.find(query).await
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn find_one(&self, id: &str) -> CrudResult<T> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CrudError::not_found(T::NAME, id))
    }

    #[instrument(skip(self, changes), fields(resource = T::NAME))]
    pub async fn update(&self, id: &str, changes: Document) -> CrudResult<T> {
        self.repository
            .update(id, changes)
            .await?
            .ok_or_else(|| CrudError::not_found(T::NAME, id))
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn remove(&self, id: &str) -> CrudResult<RemovedId> {
        if !self.repository.remove(id).await? {
            return Err(CrudError::not_found(T::NAME, id));
        }
        Ok(RemovedId { id: id.to_string() })
    }

    /// Same as [`clean_update`]; kept on the service so callers holding
    /// only the service can prepare a partial update.
    pub fn clean_update(&self, changes: Document) -> Document {
        clean_update(changes)
    }
}

impl<T: Resource, R: Repository<T>> Clone for ResourceService<T, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            _resource: PhantomData,
        }
    }
}
